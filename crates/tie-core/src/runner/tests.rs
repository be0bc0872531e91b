use super::subprocess::parse_run_output;
use super::*;

fn program() -> PreprocessedProgram {
    PreprocessedProgram {
        source: String::new(),
        separator: "tie-separator-abc".into(),
        results_marker: "tie-results-def".into(),
    }
}

#[test]
fn stdout_slices_per_case() {
    let result = CodeRunResult {
        stdout: "first case\ntie-sep\nsecond case\ntie-sep\n".into(),
        ..CodeRunResult::default()
    };
    assert_eq!(
        result.stdout_for_case("tie-sep", 0),
        Some("first case\n".to_string())
    );
    assert_eq!(
        result.stdout_for_case("tie-sep", 1),
        Some("second case\n".to_string())
    );
    // Index 2 is the (empty) tail after the final separator.
    assert_eq!(result.stdout_for_case("tie-sep", 2), Some(String::new()));
    assert_eq!(result.stdout_for_case("tie-sep", 3), None);
}

#[test]
fn mock_returns_scripted_results_in_order() {
    let runner = MockRunner::new();
    runner.push_result(CodeRunResult {
        stdout: "one".into(),
        ..CodeRunResult::default()
    });
    runner.push_result(CodeRunResult::timed_out());

    let first = runner.run(&program()).unwrap();
    assert_eq!(first.stdout, "one");
    let second = runner.run(&program()).unwrap();
    assert!(second.timed_out);
    assert_eq!(runner.run_count(), 2);
}

#[test]
fn mock_errors_when_exhausted() {
    let runner = MockRunner::new();
    let err = runner.run(&program()).unwrap_err();
    assert!(err.to_string().contains("no scripted result"));
}

#[test]
fn parse_extracts_results_after_marker() {
    let program = program();
    let stdout = format!(
        "learner output\n{}\n{}\n{}\n",
        program.separator,
        program.results_marker,
        serde_json::json!({
            "observed_outputs": [[[true]]],
            "buggy_output_results": [[false]],
            "performance_results": [["linear"]],
            "runtime_error": null,
            "error_input": null,
        })
    );
    let result = parse_run_output(&program, &stdout, "", true).unwrap();
    assert_eq!(result.observed_outputs, vec![vec![vec![serde_json::json!(true)]]]);
    assert_eq!(result.buggy_output_results, vec![vec![false]]);
    assert_eq!(result.performance_results, vec![vec!["linear".to_string()]]);
    assert!(result.runtime_error.is_none());
    assert!(result.stdout.contains("learner output"));
    assert!(!result.stdout.contains(&program.results_marker));
}

#[test]
fn parse_reports_harness_runtime_error() {
    let program = program();
    let stdout = format!(
        "{}\n{}\n{}\n",
        program.separator,
        program.results_marker,
        serde_json::json!({
            "observed_outputs": [[[]]],
            "runtime_error": {"message": "ZeroDivisionError: division by zero", "line_number": 2},
            "error_input": 0,
        })
    );
    let result = parse_run_output(&program, &stdout, "", true).unwrap();
    let error = result.runtime_error.unwrap();
    assert_eq!(error.message, "ZeroDivisionError: division by zero");
    assert_eq!(error.line_number, Some(2));
    assert_eq!(result.error_input, Some(serde_json::json!(0)));
}

#[test]
fn parse_classifies_interpreter_abort_as_runtime_error() {
    let program = program();
    let stderr = concat!(
        "  File \"/tmp/tie-program-x.py\", line 3\n",
        "    return x +\n",
        "             ^\n",
        "SyntaxError: invalid syntax\n",
    );
    let result = parse_run_output(&program, "", stderr, false).unwrap();
    let error = result.runtime_error.unwrap();
    assert_eq!(error.message, "SyntaxError: invalid syntax");
    assert_eq!(error.line_number, Some(3));
}

#[test]
fn parse_rejects_clean_exit_without_marker() {
    let program = program();
    let err = parse_run_output(&program, "no marker here\n", "", true).unwrap_err();
    assert!(err.to_string().contains("no results document"));
}

#[test]
fn parse_rejects_garbled_results_document() {
    let program = program();
    let stdout = format!("{}\nnot json", program.results_marker);
    let err = parse_run_output(&program, &stdout, "", true).unwrap_err();
    assert!(err.to_string().contains("unparsable harness output"));
}
