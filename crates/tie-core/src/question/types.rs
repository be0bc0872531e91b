use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A multi-task coding question.
///
/// Immutable once loaded. Task order defines both the instructional
/// sequence and evaluation precedence: a later task is never evaluated
/// while an earlier one is unsolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub title: String,
    pub language: String,
    /// Scaffolding the learner starts from and must not delete or rename.
    #[serde(default)]
    pub starter_code: String,
    /// Reference implementations (buggy solutions, helpers) included in the
    /// harness program. Authored as an `AuxiliaryCode` class.
    #[serde(default)]
    pub auxiliary_code: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub instructions: String,
    #[serde(default)]
    pub prerequisite_skills: Vec<String>,
    #[serde(default)]
    pub acquired_skills: Vec<String>,
    /// Name of the learner function the harness invokes per test case.
    pub main_function_name: String,
    /// Optional transform applied to each test input before the call.
    #[serde(default)]
    pub input_function_name: Option<String>,
    /// Optional transform applied to each observed output after the call.
    #[serde(default)]
    pub output_function_name: Option<String>,
    pub test_suites: Vec<TestSuite>,
    #[serde(default)]
    pub buggy_output_tests: Vec<BuggyOutputTest>,
    #[serde(default)]
    pub suite_level_tests: Vec<SuiteLevelTest>,
    #[serde(default)]
    pub performance_tests: Vec<PerformanceTest>,
    #[serde(default)]
    pub style_tests: Vec<StyleTest>,
}

impl Task {
    pub fn test_suite(&self, id: &str) -> Option<&TestSuite> {
        self.test_suites.iter().find(|s| s.id == id)
    }

    pub fn suite_ids(&self) -> Vec<&str> {
        self.test_suites.iter().map(|s| s.id.as_str()).collect()
    }

    /// Total number of test cases across all suites of this task.
    pub fn test_case_count(&self) -> usize {
        self.test_suites.iter().map(|s| s.test_cases.len()).sum()
    }
}

/// A named group of test cases, so pass/fail feedback can be given per
/// group rather than only per individual case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    /// Unique within the task.
    pub id: String,
    pub human_readable_name: String,
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Value,
    /// Acceptable outputs; must be non-empty (enforced at load time).
    pub allowed_outputs: Vec<Value>,
}

impl TestCase {
    /// A case passes iff the observed output deep-equals any allowed
    /// output. Ordered sequences compare element-wise, so `["a","b"]`
    /// does not match `["b","a"]`.
    pub fn matches_output(&self, observed: &Value) -> bool {
        self.allowed_outputs.iter().any(|a| a == observed)
    }

    /// The first allowed output, used when displaying an expected value.
    pub fn any_allowed_output(&self) -> Option<&Value> {
        self.allowed_outputs.first()
    }
}

/// Detects a specific known-incorrect implementation pattern by matching
/// the learner's outputs against a reference buggy solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuggyOutputTest {
    /// Dotted path into the auxiliary code, e.g. `AuxiliaryCode.countAll`.
    pub buggy_function_name: String,
    #[serde(default)]
    pub ignored_test_suite_ids: Vec<String>,
    /// Hint messages in increasing specificity.
    pub messages: Vec<String>,
}

/// Feedback rule keyed on which suites pass or fail as a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteLevelTest {
    #[serde(default)]
    pub test_suite_ids_that_must_pass: Vec<String>,
    #[serde(default)]
    pub test_suite_ids_that_must_fail: Vec<String>,
    /// Hint messages in increasing specificity.
    pub messages: Vec<String>,
}

impl SuiteLevelTest {
    /// Triggers when every must-pass id is among the passing suites and no
    /// must-fail id is. Passing suites outside both sets are permitted.
    pub fn conditions_met(&self, passing_suite_ids: &[String]) -> bool {
        let passes = |id: &String| passing_suite_ids.iter().any(|p| p == id);
        self.test_suite_ids_that_must_pass.iter().all(passes)
            && !self.test_suite_ids_that_must_fail.iter().any(passes)
    }
}

/// Verifies asymptotic behavior by timing the evaluation function on a
/// family of inputs scaled from `input_data_atom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceTest {
    pub input_data_atom: String,
    pub transformation_function_name: String,
    /// Growth class, e.g. `linear`.
    pub expected_performance: String,
    pub evaluation_function_name: String,
}

/// A static check on the submitted source, independent of runtime
/// behavior. Advisory only; never blocks task completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleTest {
    /// Name of a built-in static check, e.g. `uses_while_loop`.
    pub evaluation_function_name: String,
    pub expected_output: Value,
    pub message: String,
}
