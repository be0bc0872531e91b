//! Session-level configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_EXECUTION_TIMEOUT_SECS: u64 = 10;

/// Tunables for a learner session.
///
/// Only the execution time budget is configurable today; everything else in
/// the pipeline is driven by the question definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hard wall-clock limit for one harness run, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub execution_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_EXECUTION_TIMEOUT_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            execution_timeout_secs: DEFAULT_EXECUTION_TIMEOUT_SECS,
        }
    }
}

impl SessionConfig {
    pub fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.execution_timeout_secs)
    }
}
