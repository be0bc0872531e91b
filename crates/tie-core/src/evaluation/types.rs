use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::runner::RuntimeErrorInfo;

/// The first failing test case of a task, in declared suite then case
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstFailure {
    pub suite_id: String,
    pub suite_index: usize,
    pub case_index: usize,
    /// Missing when the run aborted before reaching this case.
    pub observed_output: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMismatch {
    pub test_index: usize,
    pub expected: String,
    pub observed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleFailure {
    pub test_index: usize,
    pub message: String,
    pub observed_output: Value,
}

/// Classification of one task's run results across every test category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvaluation {
    pub task_index: usize,
    /// Every suite passed and no buggy-output test triggered. Style and
    /// performance findings never block this.
    pub solved: bool,
    pub passing_suite_ids: Vec<String>,
    pub first_failure: Option<FirstFailure>,
    /// Indices into the task's buggy-output test list, authoring order.
    pub triggered_buggy_tests: Vec<usize>,
    /// Indices into the task's suite-level test list, authoring order.
    pub triggered_suite_level_tests: Vec<usize>,
    pub performance_mismatches: Vec<PerformanceMismatch>,
    pub style_failures: Vec<StyleFailure>,
    pub runtime_error: Option<RuntimeErrorInfo>,
    pub error_input: Option<Value>,
    pub timed_out: bool,
}

impl TaskEvaluation {
    pub(crate) fn unsolved(task_index: usize) -> Self {
        Self {
            task_index,
            solved: false,
            passing_suite_ids: Vec::new(),
            first_failure: None,
            triggered_buggy_tests: Vec::new(),
            triggered_suite_level_tests: Vec::new(),
            performance_mismatches: Vec::new(),
            style_failures: Vec::new(),
            runtime_error: None,
            error_input: None,
            timed_out: false,
        }
    }

    pub fn has_execution_error(&self) -> bool {
        self.timed_out || self.runtime_error.is_some()
    }
}
