//! Message builders and value rendering for learner-facing feedback.
//!
//! Values are rendered in the notation of the submission language, not
//! JSON: `None`, `True`, single-quoted strings, `[..]` lists.

use serde_json::Value;

use super::types::{Feedback, FeedbackCategory};
use crate::prereq::PrereqFailureKind;
use crate::question::TestCase;
use crate::runner::RuntimeErrorInfo;

/// Render a structured value the way the learner's language would print
/// it.
pub fn python_display(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(python_display).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("'{}': {}", k, python_display(v)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

pub fn timeout_feedback(limit_secs: u64) -> Feedback {
    let mut feedback = Feedback::new(FeedbackCategory::TimeLimitError, false);
    feedback.add_text(format!(
        "Your program exceeded run time limit ({} seconds). Check \
         whether it is stuck in an infinite loop, then submit again.",
        limit_secs
    ));
    feedback
}

pub fn runtime_error_feedback(error: &RuntimeErrorInfo, error_input: Option<&Value>) -> Feedback {
    let mut feedback = Feedback::new(FeedbackCategory::RuntimeError, false);
    match error_input {
        Some(input) => feedback.add_text(format!(
            "Looks like your code had a runtime error when evaluating the input {}.",
            python_display(input)
        )),
        None => feedback.add_text("Looks like your code had a runtime error."),
    }
    let positioned = match error.line_number {
        Some(line) => format!("{} (line {})", error.message, line),
        None => error.message.clone(),
    };
    feedback.add_error(positioned);
    feedback
}

pub fn prereq_feedback(kind: &PrereqFailureKind) -> Feedback {
    let mut feedback = Feedback::new(FeedbackCategory::PrerequisiteFailure, false);
    match kind {
        PrereqFailureKind::MissingStarterCode { starter_code } => {
            feedback.add_text(
                "It looks like you deleted or modified the starter code! Our \
                 evaluation program requires the function names given in the \
                 starter code. You can press the \"Reset Code\" button to start \
                 over:",
            );
            feedback.add_code(starter_code.clone());
        }
        PrereqFailureKind::GlobalCode => {
            feedback.add_text(
                "Please keep your code within the functions you define; code \
                 placed at the top level of the file will not be run.",
            );
        }
        PrereqFailureKind::ForbiddenNamespace { name } => {
            feedback.add_text(format!(
                "The name '{}' is reserved for the evaluation system. Please \
                 rename it and submit again.",
                name
            ));
        }
        PrereqFailureKind::UnsupportedImports { imports } => {
            feedback.add_text(format!(
                "Looks like your code requires the module(s) {}, which this \
                 environment does not support. Only the standard helpers ({}) \
                 are available.",
                imports.join(", "),
                crate::prereq::python::SUPPORTED_LIBS.join(", ")
            ));
        }
    }
    feedback
}

pub fn performance_message(expected: &str, observed: &str) -> String {
    format!(
        "Your code is running more slowly than expected: it looks {} rather \
         than {}. Can you reconfigure it so that it runs in {} time?",
        observed, expected, expected
    )
}

pub fn task_success_message() -> String {
    "You've completed this task! Here is the next one.".to_string()
}

pub fn question_success_message() -> String {
    "You've completed all the tasks for this question! Well done!".to_string()
}

/// How many rungs the incorrect-output hint ladder has: show the input,
/// then also the expected output, then also the observed output, then
/// admit there is no further detail.
pub const CORRECTNESS_STATE_COUNT: usize = 4;

/// Build the incorrect-output paragraphs for one rung of the ladder.
/// Detail is cumulative; each repeat submission reveals one more piece.
pub fn incorrect_output_paragraphs(
    feedback: &mut Feedback,
    stage: usize,
    case: &TestCase,
    observed_output: Option<&Value>,
    case_stdout: Option<&str>,
) {
    if stage >= CORRECTNESS_STATE_COUNT - 1 {
        feedback.add_text(
            "We have no more specific feedback for this task. Try walking \
             through your code by hand on the input below and see where it \
             differs from what you expect.",
        );
        feedback.add_code(python_display(&case.input));
        return;
    }

    feedback.add_text("Your code produced the wrong result on the following input:");
    feedback.add_code(python_display(&case.input));

    if stage >= 1 {
        if let Some(expected) = case.any_allowed_output() {
            feedback.add_text("The expected output is:");
            feedback.add_output(python_display(expected));
        }
    }
    if stage >= 2 {
        match observed_output {
            Some(observed) => {
                feedback.add_text("Your code returned:");
                feedback.add_output(python_display(observed));
            }
            None => feedback.add_text("Your code did not return a value for this input."),
        }
        if let Some(stdout) = case_stdout.filter(|s| !s.trim().is_empty()) {
            feedback.add_text("While running, it printed:");
            feedback.add_output(stdout.to_string());
        }
    }
}
