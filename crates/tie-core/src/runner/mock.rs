//! Scripted code runner for tests and offline development.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{CodeRunResult, CodeRunner};
use crate::error::{Result, TieError};
use crate::runtime::PreprocessedProgram;

/// Returns canned [`CodeRunResult`]s in the order they were pushed.
///
/// Tracks how many times it ran, so tests can assert that the pipeline
/// short-circuited before execution. An optional delay simulates a slow
/// interpreter for timeout and supersession tests.
#[derive(Default)]
pub struct MockRunner {
    results: Mutex<VecDeque<CodeRunResult>>,
    delay: Option<Duration>,
    runs: AtomicUsize,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_result(&self, result: CodeRunResult) {
        if let Ok(mut results) = self.results.lock() {
            results.push_back(result);
        }
    }

    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl CodeRunner for MockRunner {
    fn run(&self, _program: &PreprocessedProgram) -> Result<CodeRunResult> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.results
            .lock()
            .map_err(|_| TieError::runner("mock runner lock poisoned"))?
            .pop_front()
            .ok_or_else(|| TieError::runner("mock runner has no scripted result"))
    }
}
