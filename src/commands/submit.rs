//! `tie submit` - run one solution file against a question and print the
//! selected feedback.
//!
//! This is a one-shot session: one submission, one feedback artifact. The
//! command exits 0 whenever the pipeline ran, whether or not the answer
//! was correct; non-zero exit codes are reserved for infrastructure and
//! definition problems.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tie_core::config::SessionConfig;
use tie_core::feedback::{Feedback, FeedbackParagraph, Reinforcement};
use tie_core::runner::SubprocessRunner;
use tie_core::runtime::RuntimeRegistry;
use tie_core::session::{Session, SubmissionOutcome};
use tie_core::{question, Result};

use crate::cli::{Cli, OutputFormat, SubmitArgs};

pub fn run(cli: &Cli, args: &SubmitArgs) -> Result<()> {
    let question = question::load(&args.question)?;
    let solution = fs::read_to_string(&args.solution)?;

    let config = match args.timeout_secs {
        Some(secs) => SessionConfig {
            execution_timeout_secs: secs,
        },
        None => SessionConfig::default(),
    };
    let runner = Arc::new(SubprocessRunner::with_python(
        args.python.clone(),
        Duration::from_secs(config.execution_timeout_secs),
    ));

    let mut session = Session::new(question, &RuntimeRegistry::default(), runner, config)?;
    session.resume_at_task(args.task);

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(session.submit(&solution))?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json_doc(&outcome))?),
        OutputFormat::Human => print_human(cli, &outcome),
    }

    Ok(())
}

fn json_doc(outcome: &SubmissionOutcome) -> serde_json::Value {
    json!({
        "feedback": outcome.feedback,
        "reinforcement": outcome.reinforcement,
        "stdout": outcome.stdout,
        "state": outcome.state,
        "current_task_index": outcome.current_task_index,
    })
}

fn print_human(cli: &Cli, outcome: &SubmissionOutcome) {
    print_feedback(&outcome.feedback);

    if let Some(reinforcement) = &outcome.reinforcement {
        print_reinforcement(reinforcement);
    }

    if let Some(stdout) = &outcome.stdout {
        println!();
        println!("your code printed:");
        for line in stdout.lines() {
            println!("    {}", line);
        }
    }

    if !cli.quiet {
        println!();
        println!("current task: {}", outcome.current_task_index + 1);
    }
}

fn print_feedback(feedback: &Feedback) {
    for paragraph in &feedback.paragraphs {
        match paragraph {
            FeedbackParagraph::Text { content } => println!("{}", content),
            FeedbackParagraph::Code { content }
            | FeedbackParagraph::Output { content }
            | FeedbackParagraph::Error { content } => {
                for line in content.lines() {
                    println!("    {}", line);
                }
            }
            FeedbackParagraph::Image { content } => println!("[image: {}]", content),
        }
    }
}

fn print_reinforcement(reinforcement: &Reinforcement) {
    let passed: Vec<&str> = reinforcement
        .passed_tags
        .iter()
        .filter(|t| t.passed)
        .map(|t| t.name.as_str())
        .collect();
    if !passed.is_empty() {
        println!();
        println!("handles: {}", passed.join(", "));
    }

    let fixed: Vec<&str> = reinforcement
        .past_failed_cases
        .iter()
        .filter(|c| c.passed)
        .map(|c| c.description.as_str())
        .collect();
    if !fixed.is_empty() {
        println!("now passing: {}", fixed.join(", "));
    }
}
