//! Python runtime: prerequisite checks plus harness code generation.
//!
//! Preprocessing keeps the learner's source at module scope (the
//! prerequisite checker has already rejected top-level statements), places
//! the learner code first so traceback line numbers map directly onto the
//! submission, includes the question's auxiliary class verbatim, and
//! appends a harness that runs every test category in one pass and prints
//! a JSON results document after a marker line.

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use super::{LanguageRuntime, PreprocessedProgram};
use crate::error::Result;
use crate::prereq::{python as python_prereq, PrereqResult};
use crate::question::Question;

pub struct PythonRuntime {
    _private: (),
}

impl PythonRuntime {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for PythonRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageRuntime for PythonRuntime {
    fn language(&self) -> &'static str {
        "python"
    }

    fn check_prerequisites(&self, starter_code: &str, submitted_code: &str) -> PrereqResult {
        python_prereq::check(starter_code, submitted_code)
    }

    fn preprocess(
        &self,
        question: &Question,
        submitted_code: &str,
    ) -> Result<PreprocessedProgram> {
        let digest = run_digest(question, submitted_code);
        let separator = format!("tie-separator-{}", &digest[..24]);
        let results_marker = format!("tie-results-{}", &digest[24..48]);

        let spec_json = serde_json::to_string(&harness_spec(question))?;

        let mut source = String::new();
        source.push_str(submitted_code);
        source.push_str("\n\n");
        if !question.auxiliary_code.trim().is_empty() {
            source.push_str(&question.auxiliary_code);
            source.push_str("\n\n");
        }
        let _ = writeln!(source, "_TIE_SEPARATOR = \"{}\"", separator);
        let _ = writeln!(source, "_TIE_RESULTS_MARKER = \"{}\"", results_marker);
        // JSON never contains three consecutive double quotes, so a raw
        // triple-quoted literal cannot terminate early.
        let _ = writeln!(source, "_TIE_SPEC_JSON = r\"\"\"{}\"\"\"", spec_json);
        source.push_str(HARNESS_BODY);

        Ok(PreprocessedProgram {
            source,
            separator,
            results_marker,
        })
    }
}

/// Unique per run: covers the code under test plus a timestamp, so a
/// learner cannot predict and print the separator token.
fn run_digest(question: &Question, submitted_code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(submitted_code.as_bytes());
    hasher.update(question.auxiliary_code.as_bytes());
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    hasher.update(nanos.to_le_bytes());
    hex::encode(hasher.finalize())
}

/// The per-task test plan embedded into the harness as JSON.
fn harness_spec(question: &Question) -> serde_json::Value {
    let tasks: Vec<serde_json::Value> = question
        .tasks
        .iter()
        .map(|task| {
            let suites: Vec<serde_json::Value> = task
                .test_suites
                .iter()
                .map(|suite| {
                    let inputs: Vec<serde_json::Value> =
                        suite.test_cases.iter().map(|c| c.input.clone()).collect();
                    serde_json::json!({
                        "id": suite.id,
                        "inputs": inputs,
                    })
                })
                .collect();
            let buggy_tests: Vec<serde_json::Value> = task
                .buggy_output_tests
                .iter()
                .map(|test| {
                    serde_json::json!({
                        "buggy_function_name": test.buggy_function_name,
                        "ignored_test_suite_ids": test.ignored_test_suite_ids,
                    })
                })
                .collect();
            let performance_tests: Vec<serde_json::Value> = task
                .performance_tests
                .iter()
                .map(|test| {
                    serde_json::json!({
                        "input_data_atom": test.input_data_atom,
                        "transformation_function_name": test.transformation_function_name,
                        "evaluation_function_name": test.evaluation_function_name,
                    })
                })
                .collect();
            serde_json::json!({
                "main_function_name": task.main_function_name,
                "input_function_name": task.input_function_name,
                "output_function_name": task.output_function_name,
                "suites": suites,
                "buggy_tests": buggy_tests,
                "performance_tests": performance_tests,
            })
        })
        .collect();
    serde_json::Value::Array(tasks)
}

const HARNESS_BODY: &str = r#"
import json as _tie_json
import sys as _tie_sys
import time as _tie_time
import traceback as _tie_traceback

_tie_spec = _tie_json.loads(_TIE_SPEC_JSON)
_tie_results = {
    "observed_outputs": [],
    "buggy_output_results": [],
    "performance_results": [],
    "runtime_error": None,
    "error_input": None,
}

_TIE_PERF_SMALL_SIZE = 10
_TIE_PERF_LARGE_SIZE = 100
_TIE_PERF_LINEAR_RATIO_BOUND = 30.0


def _tie_resolve(name):
    if name is None:
        return None
    parts = name.split(".")
    obj = globals()[parts[0]]
    for part in parts[1:]:
        obj = getattr(obj, part)
    return obj


def _tie_call(fn, arg, input_fn, output_fn):
    if input_fn is not None:
        arg = input_fn(arg)
    out = fn(arg)
    if output_fn is not None:
        out = output_fn(out)
    return out


def _tie_error_line():
    tb = _tie_sys.exc_info()[2]
    frames = _tie_traceback.extract_tb(tb)
    for frame in reversed(frames):
        if frame[0] == __file__:
            return frame[1]
    return frames[-1][1] if frames else None


def _tie_run_correctness():
    for task in _tie_spec:
        main_fn = _tie_resolve(task["main_function_name"])
        input_fn = _tie_resolve(task["input_function_name"])
        output_fn = _tie_resolve(task["output_function_name"])
        task_outputs = []
        for suite in task["suites"]:
            suite_outputs = []
            for case_input in suite["inputs"]:
                try:
                    suite_outputs.append(
                        _tie_call(main_fn, case_input, input_fn, output_fn))
                except Exception as exc:
                    _tie_results["runtime_error"] = {
                        "message": "%s: %s" % (type(exc).__name__, exc),
                        "line_number": _tie_error_line(),
                    }
                    _tie_results["error_input"] = case_input
                    task_outputs.append(suite_outputs)
                    _tie_results["observed_outputs"].append(task_outputs)
                    return False
                finally:
                    print(_TIE_SEPARATOR)
            task_outputs.append(suite_outputs)
        _tie_results["observed_outputs"].append(task_outputs)
    return True


def _tie_matches_buggy(task_index, task, test):
    try:
        buggy_fn = _tie_resolve(test["buggy_function_name"])
        input_fn = _tie_resolve(task["input_function_name"])
        output_fn = _tie_resolve(task["output_function_name"])
    except Exception:
        return False
    observed_task = _tie_results["observed_outputs"][task_index]
    compared = False
    for suite_index, suite in enumerate(task["suites"]):
        if suite["id"] in test["ignored_test_suite_ids"]:
            continue
        for case_index, case_input in enumerate(suite["inputs"]):
            if suite_index >= len(observed_task):
                return False
            if case_index >= len(observed_task[suite_index]):
                return False
            try:
                buggy_out = _tie_call(buggy_fn, case_input, input_fn, output_fn)
            except Exception:
                return False
            if buggy_out != observed_task[suite_index][case_index]:
                return False
            compared = True
    return compared


def _tie_run_buggy():
    for task_index, task in enumerate(_tie_spec):
        matches = []
        for test in task["buggy_tests"]:
            matches.append(_tie_matches_buggy(task_index, task, test))
        _tie_results["buggy_output_results"].append(matches)


def _tie_classify_performance(test):
    try:
        transform = _tie_resolve(test["transformation_function_name"])
        evaluate = _tie_resolve(test["evaluation_function_name"])
        small = transform(test["input_data_atom"], _TIE_PERF_SMALL_SIZE)
        large = transform(test["input_data_atom"], _TIE_PERF_LARGE_SIZE)
        start = _tie_time.time()
        evaluate(small)
        small_elapsed = max(_tie_time.time() - start, 1e-9)
        start = _tie_time.time()
        evaluate(large)
        large_elapsed = _tie_time.time() - start
    except Exception:
        return "unknown"
    if large_elapsed / small_elapsed <= _TIE_PERF_LINEAR_RATIO_BOUND:
        return "linear"
    return "not linear"


def _tie_run_performance():
    for task in _tie_spec:
        _tie_results["performance_results"].append(
            [_tie_classify_performance(test) for test in task["performance_tests"]])


def _tie_main():
    if _tie_run_correctness():
        _tie_run_buggy()
        _tie_run_performance()
    print(_TIE_RESULTS_MARKER)
    print(_tie_json.dumps(_tie_results))


_tie_main()
"#;
