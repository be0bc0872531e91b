use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feedback::{Feedback, Reinforcement};
use crate::prereq::PrereqFailureKind;
use crate::runner::CodeRunResult;

/// Immutable record of one submission: what the checks found, what the
/// run produced, and what the learner was told.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub prereq_failure: Option<PrereqFailureKind>,
    pub run_result: Option<CodeRunResult>,
    pub feedback: Feedback,
    pub reinforcement: Option<Reinforcement>,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(
        prereq_failure: Option<PrereqFailureKind>,
        run_result: Option<CodeRunResult>,
        feedback: Feedback,
        reinforcement: Option<Reinforcement>,
    ) -> Self {
        Self {
            prereq_failure,
            run_result,
            feedback,
            reinforcement,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only history of a session's submissions. Index 0 is oldest.
/// Never mutated in place; cleared only on session reset.
#[derive(Debug, Default)]
pub struct Transcript {
    snapshots: Vec<Snapshot>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn most_recent_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.snapshots.clear();
    }
}
