//! Built-in static style checks over the submitted source.
//!
//! Checks are named in question definitions and validated at load time.
//! Findings are advisory; they never block task completion.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

const KNOWN_CHECKS: &[&str] = &[
    "count_top_level_functions",
    "uses_for_loop",
    "uses_while_loop",
];

pub fn is_known_check(name: &str) -> bool {
    KNOWN_CHECKS.contains(&name)
}

pub fn known_checks() -> &'static [&'static str] {
    KNOWN_CHECKS
}

fn top_level_def_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^def\s+\w+").unwrap_or_else(|_| unreachable!()))
}

fn for_loop_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*for\s+.+:").unwrap_or_else(|_| unreachable!()))
}

fn while_loop_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*while\s+.+:").unwrap_or_else(|_| unreachable!()))
}

/// Run a named check against the source. Callers must only pass names
/// that passed load-time validation; unknown names report null.
pub fn run_check(name: &str, source: &str) -> Value {
    let source = crate::prereq::python::obscure_string_literals(source);
    match name {
        "count_top_level_functions" => {
            Value::from(top_level_def_regex().find_iter(&source).count())
        }
        "uses_for_loop" => Value::from(for_loop_regex().is_match(&source)),
        "uses_while_loop" => Value::from(while_loop_regex().is_match(&source)),
        _ => Value::Null,
    }
}
