//! Prerequisite checking: static validation of submitted source before any
//! execution is attempted.
//!
//! A failure here short-circuits the whole pipeline; the code runner is
//! never invoked. Checks are pure functions over text.

pub mod python;


/// Why a submission failed the prerequisite check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrereqFailureKind {
    /// A line of the starter scaffolding was deleted or altered.
    MissingStarterCode { starter_code: String },
    /// Executable code found at module top level, outside any function.
    GlobalCode,
    /// The submission references a name reserved by the test harness.
    ForbiddenNamespace { name: String },
    /// Imports outside the supported-library whitelist.
    UnsupportedImports { imports: Vec<String> },
}

/// Outcome of the prerequisite check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrereqResult {
    Passed,
    Failed(PrereqFailureKind),
}

impl PrereqResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, PrereqResult::Passed)
    }

    pub fn failure(&self) -> Option<&PrereqFailureKind> {
        match self {
            PrereqResult::Passed => None,
            PrereqResult::Failed(kind) => Some(kind),
        }
    }
}
