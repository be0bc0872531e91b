//! Positive reinforcement bullets accompanying the main feedback.
//!
//! Tracks which suites the learner has conquered and which previously
//! failing cases now pass, carried forward between submissions on the
//! same task.

use serde::{Deserialize, Serialize};

use super::messages::python_display;
use crate::evaluation::TaskEvaluation;
use crate::question::Question;
use crate::runner::CodeRunResult;
use crate::session::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinforcementTag {
    /// Suite's human-readable name, e.g. "the general case".
    pub name: String,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinforcementCase {
    /// Rendered test input, e.g. `'(()'`.
    pub description: String,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reinforcement {
    pub task_index: usize,
    pub passed_tags: Vec<ReinforcementTag>,
    pub past_failed_cases: Vec<ReinforcementCase>,
}

impl Reinforcement {
    fn empty(task_index: usize) -> Self {
        Self {
            task_index,
            passed_tags: Vec::new(),
            past_failed_cases: Vec::new(),
        }
    }
}

/// Build the reinforcement for the active task, extending the previous
/// snapshot's reinforcement when the learner is still on the same task.
pub fn generate(
    question: &Question,
    evaluation: &TaskEvaluation,
    run: &CodeRunResult,
    previous: Option<&Snapshot>,
) -> Reinforcement {
    let task = &question.tasks[evaluation.task_index];
    let mut reinforcement = match previous.and_then(|s| s.reinforcement.as_ref()) {
        Some(prev) if prev.task_index == evaluation.task_index => prev.clone(),
        _ => Reinforcement::empty(evaluation.task_index),
    };

    for suite in &task.test_suites {
        let passed = evaluation
            .passing_suite_ids
            .iter()
            .any(|id| id == &suite.id);
        match reinforcement
            .passed_tags
            .iter_mut()
            .find(|tag| tag.name == suite.human_readable_name)
        {
            Some(tag) => tag.passed = passed,
            None if passed => reinforcement.passed_tags.push(ReinforcementTag {
                name: suite.human_readable_name.clone(),
                passed: true,
            }),
            None => {}
        }
    }

    update_past_cases(task, evaluation, run, &mut reinforcement);

    if let Some(failure) = &evaluation.first_failure {
        let case = &task.test_suites[failure.suite_index].test_cases[failure.case_index];
        let description = python_display(&case.input);
        match reinforcement
            .past_failed_cases
            .iter_mut()
            .find(|c| c.description == description)
        {
            Some(tracked) => tracked.passed = false,
            // At most one newly failing case is added per submission.
            None => reinforcement.past_failed_cases.push(ReinforcementCase {
                description,
                passed: false,
            }),
        }
    }

    reinforcement
}

fn update_past_cases(
    task: &crate::question::Task,
    evaluation: &TaskEvaluation,
    run: &CodeRunResult,
    reinforcement: &mut Reinforcement,
) {
    for tracked in &mut reinforcement.past_failed_cases {
        for (suite_index, suite) in task.test_suites.iter().enumerate() {
            for (case_index, case) in suite.test_cases.iter().enumerate() {
                if python_display(&case.input) != tracked.description {
                    continue;
                }
                let observed = run.observed_output(evaluation.task_index, suite_index, case_index);
                tracked.passed = observed.is_some_and(|o| case.matches_output(o));
            }
        }
    }
}
