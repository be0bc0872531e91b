//! Question data model: loading and load-time validation.
//!
//! Question definitions are YAML documents deserialized into [`Question`].
//! Malformed definitions fail fast here, before any session exists, so
//! configuration mistakes never surface as learner-facing feedback.

mod types;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub use types::{
    BuggyOutputTest, PerformanceTest, Question, StyleTest, SuiteLevelTest, Task, TestCase,
    TestSuite,
};

use crate::error::{Result, TieError};
use crate::evaluation::style;

/// Load a question definition from a YAML file and validate it.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Question> {
    let content = fs::read_to_string(path.as_ref())?;
    load_from_str(&content)
}

/// Parse a question definition from YAML text and validate it.
pub fn load_from_str(content: &str) -> Result<Question> {
    let question: Question = serde_yaml::from_str(content)?;
    validate(&question)?;
    Ok(question)
}

/// Check the structural invariants of a question definition.
pub fn validate(question: &Question) -> Result<()> {
    if question.tasks.is_empty() {
        return Err(TieError::invalid_question(format!(
            "question '{}' has no tasks",
            question.id
        )));
    }

    for (task_index, task) in question.tasks.iter().enumerate() {
        validate_task(task_index, task)?;
    }

    Ok(())
}

fn validate_task(task_index: usize, task: &Task) -> Result<()> {
    if task.test_suites.is_empty() {
        return Err(TieError::invalid_question(format!(
            "task {} has no test suites",
            task_index
        )));
    }

    let mut seen_ids = HashSet::new();
    for suite in &task.test_suites {
        if !seen_ids.insert(suite.id.as_str()) {
            return Err(TieError::invalid_question(format!(
                "task {} has duplicate test suite id '{}'",
                task_index, suite.id
            )));
        }
        for (case_index, case) in suite.test_cases.iter().enumerate() {
            if case.allowed_outputs.is_empty() {
                return Err(TieError::invalid_question(format!(
                    "task {} suite '{}' case {} has no allowed outputs",
                    task_index, suite.id, case_index
                )));
            }
        }
    }

    validate_suite_references(task_index, task, &seen_ids)?;

    for style_test in &task.style_tests {
        if !style::is_known_check(&style_test.evaluation_function_name) {
            return Err(TieError::invalid_question(format!(
                "task {} references unknown style check '{}'",
                task_index, style_test.evaluation_function_name
            )));
        }
    }

    Ok(())
}

fn validate_suite_references(
    task_index: usize,
    task: &Task,
    known_ids: &HashSet<&str>,
) -> Result<()> {
    for buggy in &task.buggy_output_tests {
        if buggy.messages.is_empty() {
            return Err(TieError::invalid_question(format!(
                "task {} buggy test '{}' has no messages",
                task_index, buggy.buggy_function_name
            )));
        }
        for id in &buggy.ignored_test_suite_ids {
            if !known_ids.contains(id.as_str()) {
                return Err(TieError::invalid_question(format!(
                    "task {} buggy test '{}' ignores unknown suite '{}'",
                    task_index, buggy.buggy_function_name, id
                )));
            }
        }
    }

    for (test_index, suite_level) in task.suite_level_tests.iter().enumerate() {
        if suite_level.messages.is_empty() {
            return Err(TieError::invalid_question(format!(
                "task {} suite-level test {} has no messages",
                task_index, test_index
            )));
        }
        let referenced = suite_level
            .test_suite_ids_that_must_pass
            .iter()
            .chain(&suite_level.test_suite_ids_that_must_fail);
        for id in referenced {
            if !known_ids.contains(id.as_str()) {
                return Err(TieError::invalid_question(format!(
                    "task {} suite-level test {} references unknown suite '{}'",
                    task_index, test_index, id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
