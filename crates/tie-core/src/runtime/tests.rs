use std::sync::Arc;

use super::*;
use crate::question::{Question, Task, TestCase, TestSuite};

fn sample_question() -> Question {
    Question {
        id: "sample".into(),
        title: "Sample".into(),
        language: "python".into(),
        starter_code: "def f(x):\n    return x".into(),
        auxiliary_code: "class AuxiliaryCode(object):\n    pass".into(),
        tasks: vec![Task {
            instructions: "Return the input.".into(),
            prerequisite_skills: vec![],
            acquired_skills: vec![],
            main_function_name: "f".into(),
            input_function_name: None,
            output_function_name: None,
            test_suites: vec![TestSuite {
                id: "GENERAL".into(),
                human_readable_name: "the general case".into(),
                test_cases: vec![TestCase {
                    input: serde_json::json!("a"),
                    allowed_outputs: vec![serde_json::json!("a")],
                }],
            }],
            buggy_output_tests: vec![],
            suite_level_tests: vec![],
            performance_tests: vec![],
            style_tests: vec![],
        }],
    }
}

#[test]
fn registry_resolves_python() {
    let registry = RuntimeRegistry::default();
    let runtime = registry.get("python").unwrap();
    assert_eq!(runtime.language(), "python");
    assert_eq!(registry.supported_languages(), vec!["python"]);
}

#[test]
fn registry_rejects_unknown_language() {
    let registry = RuntimeRegistry::default();
    let err = registry.get("cobol").unwrap_err();
    assert!(err.to_string().contains("unsupported language: cobol"));
    assert!(err.to_string().contains("python"));
}

#[test]
fn registry_accepts_additional_runtimes() {
    struct FakeRuntime;
    impl LanguageRuntime for FakeRuntime {
        fn language(&self) -> &'static str {
            "fake"
        }
        fn check_prerequisites(&self, _: &str, _: &str) -> PrereqResult {
            PrereqResult::Passed
        }
        fn preprocess(
            &self,
            _: &Question,
            submitted_code: &str,
        ) -> crate::Result<PreprocessedProgram> {
            Ok(PreprocessedProgram {
                source: submitted_code.to_string(),
                separator: "sep".into(),
                results_marker: "marker".into(),
            })
        }
    }

    let mut registry = RuntimeRegistry::default();
    registry.register(Arc::new(FakeRuntime));
    assert_eq!(registry.supported_languages(), vec!["fake", "python"]);
}

#[test]
fn preprocess_places_learner_code_first() {
    let question = sample_question();
    let runtime = PythonRuntime::new();
    let submission = "def f(x):\n    return x";
    let program = runtime.preprocess(&question, submission).unwrap();

    assert!(program.source.starts_with(submission));
    let learner_pos = program.source.find("def f(x)").unwrap();
    let auxiliary_pos = program.source.find("class AuxiliaryCode").unwrap();
    assert!(learner_pos < auxiliary_pos);
}

#[test]
fn preprocess_embeds_separator_marker_and_plan() {
    let question = sample_question();
    let runtime = PythonRuntime::new();
    let program = runtime
        .preprocess(&question, "def f(x):\n    return x")
        .unwrap();

    assert_ne!(program.separator, program.results_marker);
    assert!(program
        .source
        .contains(&format!("_TIE_SEPARATOR = \"{}\"", program.separator)));
    assert!(program.source.contains(&format!(
        "_TIE_RESULTS_MARKER = \"{}\"",
        program.results_marker
    )));
    // The embedded plan carries the suite ids and inputs.
    assert!(program.source.contains("GENERAL"));
    assert!(program.source.contains("_tie_run_correctness"));
}

#[test]
fn separator_varies_between_runs() {
    let question = sample_question();
    let runtime = PythonRuntime::new();
    let a = runtime
        .preprocess(&question, "def f(x):\n    return x")
        .unwrap();
    let b = runtime
        .preprocess(&question, "def f(x):\n    return x + ''")
        .unwrap();
    assert_ne!(a.separator, b.separator);
}

#[test]
fn prerequisites_delegate_to_python_checker() {
    let runtime = PythonRuntime::new();
    let starter = "def f(x):\n    return x";
    assert!(runtime.check_prerequisites(starter, starter).is_passed());
    assert!(!runtime
        .check_prerequisites(starter, "def g(x):\n    return x")
        .is_passed());
}
