use super::*;

const BALANCED_PARENS_YAML: &str = r#"
id: balanced-parens
title: Balanced Parentheses
language: python
starter_code: |
  def is_balanced(s):
      return True
auxiliary_code: |
  class AuxiliaryCode(object):
      @classmethod
      def alwaysTrue(cls, s):
          return True
tasks:
  - instructions: Determine whether the parentheses in the input balance.
    main_function_name: is_balanced
    test_suites:
      - id: GENERAL
        human_readable_name: the general case
        test_cases:
          - input: "(())"
            allowed_outputs: [true]
          - input: "(()"
            allowed_outputs: [false]
      - id: EMPTY
        human_readable_name: the empty string
        test_cases:
          - input: ""
            allowed_outputs: [true]
    buggy_output_tests:
      - buggy_function_name: AuxiliaryCode.alwaysTrue
        ignored_test_suite_ids: [EMPTY]
        messages:
          - Are you sure every input balances?
          - Try your code on "(()".
    suite_level_tests:
      - test_suite_ids_that_must_pass: [GENERAL]
        test_suite_ids_that_must_fail: [EMPTY]
        messages:
          - What happens when the input is empty?
"#;

#[test]
fn load_parses_valid_question() {
    let question = load_from_str(BALANCED_PARENS_YAML).unwrap();
    assert_eq!(question.id, "balanced-parens");
    assert_eq!(question.language, "python");
    assert_eq!(question.tasks.len(), 1);

    let task = &question.tasks[0];
    assert_eq!(task.main_function_name, "is_balanced");
    assert_eq!(task.test_suites.len(), 2);
    assert_eq!(task.test_case_count(), 3);
    assert_eq!(task.buggy_output_tests.len(), 1);
    assert!(task.test_suite("EMPTY").is_some());
    assert!(task.test_suite("MISSING").is_none());
}

#[test]
fn validate_rejects_empty_allowed_outputs() {
    let yaml = r#"
id: q
title: Q
language: python
tasks:
  - instructions: Do the thing.
    main_function_name: f
    test_suites:
      - id: S1
        human_readable_name: suite one
        test_cases:
          - input: 1
            allowed_outputs: []
"#;
    let err = load_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("no allowed outputs"));
    assert_eq!(err.exit_code(), crate::error::ExitCode::Data);
}

#[test]
fn validate_rejects_duplicate_suite_ids() {
    let yaml = r#"
id: q
title: Q
language: python
tasks:
  - instructions: Do the thing.
    main_function_name: f
    test_suites:
      - id: S1
        human_readable_name: suite one
        test_cases:
          - input: 1
            allowed_outputs: [1]
      - id: S1
        human_readable_name: suite one again
        test_cases:
          - input: 2
            allowed_outputs: [2]
"#;
    let err = load_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate test suite id 'S1'"));
}

#[test]
fn validate_rejects_unknown_suite_reference() {
    let yaml = r#"
id: q
title: Q
language: python
tasks:
  - instructions: Do the thing.
    main_function_name: f
    test_suites:
      - id: S1
        human_readable_name: suite one
        test_cases:
          - input: 1
            allowed_outputs: [1]
    suite_level_tests:
      - test_suite_ids_that_must_pass: [S1, GHOST]
        messages: [msg]
"#;
    let err = load_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("unknown suite 'GHOST'"));
}

#[test]
fn validate_rejects_unknown_style_check() {
    let yaml = r#"
id: q
title: Q
language: python
tasks:
  - instructions: Do the thing.
    main_function_name: f
    test_suites:
      - id: S1
        human_readable_name: suite one
        test_cases:
          - input: 1
            allowed_outputs: [1]
    style_tests:
      - evaluation_function_name: count_semicolons
        expected_output: 0
        message: No semicolons please.
"#;
    let err = load_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("unknown style check"));
}

#[test]
fn validate_rejects_question_without_tasks() {
    let yaml = r#"
id: q
title: Q
language: python
tasks: []
"#;
    let err = load_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("has no tasks"));
}

#[test]
fn matches_output_uses_deep_equality() {
    let question = load_from_str(BALANCED_PARENS_YAML).unwrap();
    let case = &question.tasks[0].test_suites[0].test_cases[0];
    assert!(case.matches_output(&serde_json::json!(true)));
    assert!(!case.matches_output(&serde_json::json!(false)));
    assert!(!case.matches_output(&serde_json::json!("true")));
}

#[test]
fn ordered_sequences_do_not_match_permutations() {
    let case = TestCase {
        input: serde_json::json!(2),
        allowed_outputs: vec![serde_json::json!(["a", "b"])],
    };
    assert!(case.matches_output(&serde_json::json!(["a", "b"])));
    assert!(!case.matches_output(&serde_json::json!(["b", "a"])));
}

#[test]
fn suite_level_conditions() {
    let test = SuiteLevelTest {
        test_suite_ids_that_must_pass: vec!["P1".into(), "P2".into()],
        test_suite_ids_that_must_fail: vec!["F1".into()],
        messages: vec!["msg".into()],
    };
    let passing = |ids: &[&str]| ids.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    assert!(test.conditions_met(&passing(&["P1", "P2"])));
    assert!(!test.conditions_met(&passing(&["P1"])));
    assert!(!test.conditions_met(&passing(&["P1", "P2", "F1"])));
    assert!(test.conditions_met(&passing(&["P1", "P2", "EXTRA"])));
}
