//! `tie show` - print a summary of a question definition: its tasks, test
//! suites, and the skills each task teaches.

use std::path::Path;

use serde_json::json;
use tie_core::question::{Question, Task};
use tie_core::{question, Result};

use crate::cli::{Cli, OutputFormat};

pub fn run(cli: &Cli, path: &Path) -> Result<()> {
    let question = question::load(path)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json_doc(&question))?),
        OutputFormat::Human => print_human(&question),
    }

    Ok(())
}

fn json_doc(question: &Question) -> serde_json::Value {
    json!({
        "id": question.id,
        "title": question.title,
        "language": question.language,
        "tasks": question.tasks.iter().map(task_doc).collect::<Vec<_>>(),
    })
}

fn task_doc(task: &Task) -> serde_json::Value {
    json!({
        "main_function": task.main_function_name,
        "acquired_skills": task.acquired_skills,
        "test_case_count": task.test_case_count(),
        "test_suites": task
            .test_suites
            .iter()
            .map(|s| json!({
                "id": s.id,
                "name": s.human_readable_name,
                "case_count": s.test_cases.len(),
            }))
            .collect::<Vec<_>>(),
    })
}

fn print_human(question: &Question) {
    println!("{} ({})", question.title, question.language);
    println!("id: {}", question.id);

    for (index, task) in question.tasks.iter().enumerate() {
        println!();
        println!("task {} - calls {}()", index + 1, task.main_function_name);
        for suite in &task.test_suites {
            println!(
                "  suite {}: {} ({} case{})",
                suite.id,
                suite.human_readable_name,
                suite.test_cases.len(),
                if suite.test_cases.len() == 1 { "" } else { "s" }
            );
        }
        if !task.acquired_skills.is_empty() {
            println!("  teaches: {}", task.acquired_skills.join(", "));
        }
    }
}
