//! `tie validate` - load a question definition and report whether it is
//! well formed. Exit code 3 on a malformed definition.

use std::path::Path;

use serde_json::json;
use tie_core::{question, Result};

use crate::cli::{Cli, OutputFormat};

pub fn run(cli: &Cli, path: &Path) -> Result<()> {
    let question = question::load(path)?;
    tracing::debug!(id = %question.id, tasks = question.tasks.len(), "question validated");

    match cli.format {
        OutputFormat::Json => {
            let doc = json!({
                "status": "ok",
                "id": question.id,
                "title": question.title,
                "language": question.language,
                "task_count": question.tasks.len(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "{}: ok ({} task{})",
                    question.id,
                    question.tasks.len(),
                    if question.tasks.len() == 1 { "" } else { "s" }
                );
            }
        }
    }

    Ok(())
}
