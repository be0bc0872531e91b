//! Code runner boundary: executes a preprocessed harness program and
//! returns its structured results.
//!
//! Implementations are synchronous; the session hosts them on a blocking
//! task and applies the wall-clock budget. Infrastructure faults (spawn
//! failures, unparsable harness output) are errors; learner-visible
//! outcomes (runtime errors, timeouts) are data on [`CodeRunResult`].

pub mod mock;
pub mod subprocess;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::runtime::PreprocessedProgram;

pub use mock::MockRunner;
pub use subprocess::SubprocessRunner;

/// A runtime error reported by the harness, positioned against the
/// learner's submission (the learner code sits first in the generated
/// program, so line numbers map one-to-one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeErrorInfo {
    pub message: String,
    #[serde(default)]
    pub line_number: Option<u32>,
}

/// Structured result of one harness run.
///
/// `observed_outputs` is indexed `[task][suite][case]`; trailing entries
/// are absent when a runtime error aborted the run early.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeRunResult {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub observed_outputs: Vec<Vec<Vec<Value>>>,
    #[serde(default)]
    pub buggy_output_results: Vec<Vec<bool>>,
    #[serde(default)]
    pub performance_results: Vec<Vec<String>>,
    #[serde(default)]
    pub runtime_error: Option<RuntimeErrorInfo>,
    #[serde(default)]
    pub error_input: Option<Value>,
    #[serde(default)]
    pub timed_out: bool,
}

impl CodeRunResult {
    /// Result standing in for a run that was killed at the time budget.
    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    /// The learner's print output for one test case, by flat case index
    /// across the whole run. The harness prints the separator on its own
    /// line after each case.
    pub fn stdout_for_case(&self, separator: &str, flat_index: usize) -> Option<String> {
        let boundary = format!("{}\n", separator);
        self.stdout
            .split(boundary.as_str())
            .nth(flat_index)
            .map(|segment| segment.to_string())
    }

    /// Observed output for one case, if the run got that far.
    pub fn observed_output(
        &self,
        task_index: usize,
        suite_index: usize,
        case_index: usize,
    ) -> Option<&Value> {
        self.observed_outputs
            .get(task_index)?
            .get(suite_index)?
            .get(case_index)
    }
}

/// Executes one preprocessed program to completion.
pub trait CodeRunner: Send + Sync {
    fn run(&self, program: &PreprocessedProgram) -> Result<CodeRunResult>;
}

#[cfg(test)]
mod tests;
