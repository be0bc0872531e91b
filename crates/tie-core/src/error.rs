//! Error types and exit codes for TIE.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (malformed question definition)

use thiserror::Error;

/// Exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - malformed question definition (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during TIE operations.
///
/// Learner-facing outcomes (prerequisite failures, runtime errors, timeouts,
/// output mismatches) are not errors; they flow through the feedback policy.
/// These variants cover configuration problems and infrastructure faults.
#[derive(Error, Debug)]
pub enum TieError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Data errors (exit code 3)
    #[error("invalid question: {reason}")]
    InvalidQuestion { reason: String },

    #[error("unsupported language: {language} (supported: {supported})")]
    UnsupportedLanguage { language: String, supported: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("code runner failure: {reason}")]
    Runner { reason: String },

    #[error("submission superseded by a newer one")]
    Superseded,

    #[error("session is already complete")]
    SessionComplete,

    #[error("{0}")]
    Other(String),
}

impl TieError {
    /// Create an error for a malformed question definition
    pub fn invalid_question(reason: impl Into<String>) -> Self {
        TieError::InvalidQuestion {
            reason: reason.into(),
        }
    }

    /// Create an error for a code runner infrastructure fault
    pub fn runner(reason: impl Into<String>) -> Self {
        TieError::Runner {
            reason: reason.into(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            TieError::UnknownFormat(_) | TieError::UsageError(_) => ExitCode::Usage,

            TieError::InvalidQuestion { .. } | TieError::UnsupportedLanguage { .. } => {
                ExitCode::Data
            }

            TieError::Io(_)
            | TieError::Yaml(_)
            | TieError::Json(_)
            | TieError::Runner { .. }
            | TieError::Superseded
            | TieError::SessionComplete
            | TieError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            TieError::UnknownFormat(_) => "unknown_format",
            TieError::UsageError(_) => "usage_error",
            TieError::InvalidQuestion { .. } => "invalid_question",
            TieError::UnsupportedLanguage { .. } => "unsupported_language",
            TieError::Io(_) => "io_error",
            TieError::Yaml(_) => "yaml_error",
            TieError::Json(_) => "json_error",
            TieError::Runner { .. } => "runner_error",
            TieError::Superseded => "superseded",
            TieError::SessionComplete => "session_complete",
            TieError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for TIE operations
pub type Result<T> = std::result::Result<T, TieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_map_by_category() {
        assert_eq!(
            TieError::UsageError("bad".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            TieError::invalid_question("no tasks").exit_code(),
            ExitCode::Data
        );
        assert_eq!(TieError::runner("spawn failed").exit_code(), ExitCode::Failure);
        assert_eq!(TieError::Superseded.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn to_json_carries_type_and_message() {
        let err = TieError::invalid_question("task 0 has no test suites");
        let json = err.to_json();
        assert_eq!(json["error"]["type"], "invalid_question");
        assert_eq!(json["error"]["code"], 3);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("task 0 has no test suites"));
    }
}
