//! Integration tests for the tie binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUESTION_YAML: &str = r#"
id: reverse-string
title: Reverse a String
language: python
starter_code: "def reverse(s):"
tasks:
  - instructions: Reverse the input string.
    main_function_name: reverse
    acquired_skills:
      - string slicing
    test_suites:
      - id: GENERAL
        human_readable_name: the general case
        test_cases:
          - input: "ab"
            allowed_outputs: ["ba"]
          - input: "xyz"
            allowed_outputs: ["zyx"]
      - id: EMPTY
        human_readable_name: the empty string
        test_cases:
          - input: ""
            allowed_outputs: [""]
"#;

fn tie() -> Command {
    Command::cargo_bin("tie").expect("binary builds")
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write test file");
    path
}

fn question_file(dir: &TempDir) -> PathBuf {
    write_file(dir, "question.yaml", QUESTION_YAML)
}

fn python3_available() -> bool {
    StdCommand::new("python3")
        .arg("--version")
        .output()
        .is_ok()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn validate_accepts_a_well_formed_question() {
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);

    tie()
        .args(["validate", path_arg(&question)])
        .assert()
        .success()
        .stdout(predicate::str::contains("reverse-string: ok (1 task)"));
}

#[test]
fn validate_rejects_a_question_without_tasks_with_data_exit_code() {
    let dir = TempDir::new().unwrap();
    let question = write_file(
        &dir,
        "empty.yaml",
        "id: empty\ntitle: Empty\nlanguage: python\ntasks: []\n",
    );

    tie()
        .args(["validate", path_arg(&question)])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid question"));
}

#[test]
fn validate_missing_file_is_a_generic_failure() {
    tie()
        .args(["validate", "/nonexistent/question.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn validate_emits_json_error_envelope_when_requested() {
    let dir = TempDir::new().unwrap();
    let question = write_file(
        &dir,
        "empty.yaml",
        "id: empty\ntitle: Empty\nlanguage: python\ntasks: []\n",
    );

    let output = tie()
        .args(["--format", "json", "validate", path_arg(&question)])
        .assert()
        .code(3)
        .get_output()
        .clone();

    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(envelope["error"]["code"], 3);
    assert_eq!(envelope["error"]["type"], "invalid_question");
}

#[test]
fn show_prints_a_question_summary() {
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);

    tie()
        .args(["show", path_arg(&question)])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Reverse a String (python)")
                .and(predicate::str::contains("the general case"))
                .and(predicate::str::contains("teaches: string slicing")),
        );
}

#[test]
fn show_json_carries_suite_structure() {
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);

    let output = tie()
        .args(["--format", "json", "show", path_arg(&question)])
        .assert()
        .success()
        .get_output()
        .clone();

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(doc["id"], "reverse-string");
    assert_eq!(doc["tasks"][0]["test_case_count"], 3);
    assert_eq!(doc["tasks"][0]["test_suites"][0]["id"], "GENERAL");
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    tie().arg("frobnicate").assert().code(2);
}

#[test]
fn usage_error_respects_json_format_flag() {
    let output = tie()
        .args(["--format", "json", "frobnicate"])
        .assert()
        .code(2)
        .get_output()
        .clone();

    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr is JSON");
    assert_eq!(envelope["error"]["code"], 2);
    assert_eq!(envelope["error"]["type"], "usage_error");
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    tie().assert().code(2);
}

#[test]
fn submit_correct_solution_completes_the_question() {
    if !python3_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);
    let solution = write_file(
        &dir,
        "solution.py",
        "def reverse(s):\n    return s[::-1]\n",
    );

    tie()
        .args(["submit", path_arg(&question), path_arg(&solution)])
        .assert()
        .success()
        .stdout(predicate::str::contains("all the tasks for this question"));
}

#[test]
fn submit_wrong_solution_reports_the_failing_input() {
    if !python3_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);
    let solution = write_file(&dir, "solution.py", "def reverse(s):\n    return s\n");

    let assert = tie()
        .args(["--format", "json", "submit", path_arg(&question), path_arg(&solution)])
        .assert()
        .success();

    let doc: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("stdout is JSON");
    assert_eq!(doc["feedback"]["category"], "incorrect_output_failure");
    assert_eq!(doc["feedback"]["is_answer_correct"], false);
    assert_eq!(doc["current_task_index"], 0);
}

#[test]
fn submit_syntax_error_surfaces_as_runtime_feedback() {
    if !python3_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);
    let solution = write_file(
        &dir,
        "broken.py",
        "def reverse(s):\n    return s[::-1\n",
    );

    tie()
        .args(["submit", path_arg(&question), path_arg(&solution)])
        .assert()
        .success()
        .stdout(predicate::str::contains("SyntaxError"));
}

#[test]
fn submit_prereq_violation_never_runs_the_code() {
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);
    let solution = write_file(
        &dir,
        "imports.py",
        "import os\n\ndef reverse(s):\n    return s[::-1]\n",
    );

    tie()
        .args(["submit", path_arg(&question), path_arg(&solution)])
        .assert()
        .success()
        .stdout(predicate::str::contains("os"));
}

#[test]
fn submit_infinite_loop_hits_the_time_limit() {
    if !python3_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let question = question_file(&dir);
    let solution = write_file(
        &dir,
        "loop.py",
        "def reverse(s):\n    while True:\n        pass\n",
    );

    tie()
        .args([
            "submit",
            path_arg(&question),
            path_arg(&solution),
            "--timeout-secs",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("exceeded run time limit"));
}
