//! Python prerequisite checks.
//!
//! Order matters: starter scaffolding first, then top-level code, then
//! reserved harness names, then the import whitelist. The first failing
//! check wins. Scans that could false-positive inside string literals run
//! over an obscured copy of the source with literal content blanked out.

use std::sync::OnceLock;

use regex::Regex;

use super::{PrereqFailureKind, PrereqResult};

/// Modules the sandbox permits learners to import.
pub const SUPPORTED_LIBS: &[&str] = &[
    "collections",
    "math",
    "operator",
    "random",
    "re",
    "string",
    "time",
];

// System, AuxiliaryCode and StudentCode are claimed by the harness.
fn reserved_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(System|AuxiliaryCode|StudentCode)\b").unwrap_or_else(|_| unreachable!())
    })
}

fn import_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^import\s+(\w+)").unwrap_or_else(|_| unreachable!()))
}

/// Run all prerequisite checks against a submission.
pub fn check(starter_code: &str, submitted_code: &str) -> PrereqResult {
    if let Some(failure) = check_starter_code(starter_code, submitted_code) {
        return PrereqResult::Failed(failure);
    }

    let obscured = obscure_string_literals(submitted_code);

    if let Some(failure) = check_global_code(&obscured) {
        return PrereqResult::Failed(failure);
    }
    if let Some(failure) = check_reserved_names(&obscured) {
        return PrereqResult::Failed(failure);
    }
    if let Some(failure) = check_imports(&obscured) {
        return PrereqResult::Failed(failure);
    }

    PrereqResult::Passed
}

/// Every non-blank line of the starter code, trimmed, must appear among
/// the submission's trimmed lines. Set containment, not subsequence
/// matching: reordering is allowed, deletion and renaming are not.
fn check_starter_code(starter_code: &str, submitted_code: &str) -> Option<PrereqFailureKind> {
    let submitted_lines: std::collections::HashSet<&str> =
        submitted_code.lines().map(str::trim).collect();

    let all_present = starter_code
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .all(|line| submitted_lines.contains(line));

    if all_present {
        None
    } else {
        Some(PrereqFailureKind::MissingStarterCode {
            starter_code: starter_code.to_string(),
        })
    }
}

/// Top-level lines must be blank, indented, or start a def/import/comment.
/// Anything else is executable global code, which the harness forbids.
fn check_global_code(obscured_code: &str) -> Option<PrereqFailureKind> {
    for line in obscured_code.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let trimmed = line.trim_start();
        if trimmed.starts_with("def ")
            || trimmed.starts_with("import ")
            || trimmed.starts_with('#')
        {
            continue;
        }
        return Some(PrereqFailureKind::GlobalCode);
    }
    None
}

fn check_reserved_names(obscured_code: &str) -> Option<PrereqFailureKind> {
    reserved_name_regex()
        .find(obscured_code)
        .map(|m| PrereqFailureKind::ForbiddenNamespace {
            name: m.as_str().to_string(),
        })
}

fn check_imports(obscured_code: &str) -> Option<PrereqFailureKind> {
    let offending: Vec<String> = import_regex()
        .captures_iter(obscured_code)
        .map(|c| c[1].to_string())
        .filter(|module| !SUPPORTED_LIBS.contains(&module.as_str()))
        .collect();

    if offending.is_empty() {
        None
    } else {
        Some(PrereqFailureKind::UnsupportedImports { imports: offending })
    }
}

/// Replace every character inside a string literal with a filler, keeping
/// length and line structure intact so match positions stay meaningful.
pub fn obscure_string_literals(code: &str) -> String {
    let mut result = String::with_capacity(code.len());
    let mut delimiter: Option<char> = None;
    let mut escaped = false;

    for ch in code.chars() {
        match delimiter {
            None => {
                if ch == '\'' || ch == '"' {
                    delimiter = Some(ch);
                }
                result.push(ch);
            }
            Some(quote) => {
                if escaped {
                    escaped = false;
                    result.push('x');
                } else if ch == '\\' {
                    escaped = true;
                    result.push('x');
                } else if ch == quote {
                    delimiter = None;
                    result.push(ch);
                } else if ch == '\n' {
                    // Unterminated literal; keep the line break.
                    delimiter = None;
                    result.push(ch);
                } else {
                    result.push('x');
                }
            }
        }
    }

    result
}
