//! Test evaluation engine: interprets raw run results against a
//! question's test suites to classify the outcome per task.

pub mod style;
mod types;

pub use types::{FirstFailure, PerformanceMismatch, StyleFailure, TaskEvaluation};

use crate::question::{Question, Task};
use crate::runner::CodeRunResult;

/// Evaluate a whole submission, task by task in declared order.
///
/// Stops at the first unsolved task; a later task is never evaluated
/// while an earlier one is unsolved. A runtime error or timeout yields a
/// single evaluation for the task the run was in when it stopped.
pub fn evaluate_submission(
    question: &Question,
    run: &CodeRunResult,
    submitted_code: &str,
) -> Vec<TaskEvaluation> {
    if run.timed_out || run.runtime_error.is_some() {
        let task_index = run.observed_outputs.len().saturating_sub(1);
        let mut evaluation = TaskEvaluation::unsolved(task_index);
        evaluation.timed_out = run.timed_out;
        evaluation.runtime_error = run.runtime_error.clone();
        evaluation.error_input = run.error_input.clone();
        return vec![evaluation];
    }

    let mut evaluations = Vec::new();
    for (task_index, task) in question.tasks.iter().enumerate() {
        let evaluation = evaluate_task(task_index, task, run, submitted_code);
        // A performance mismatch holds the learner on this task even
        // though correctness passed.
        let advance = evaluation.solved && evaluation.performance_mismatches.is_empty();
        evaluations.push(evaluation);
        if !advance {
            break;
        }
    }
    evaluations
}

/// Position of a test case in the flat run order the harness used, for
/// slicing stdout by separator.
pub fn flat_case_index(
    question: &Question,
    task_index: usize,
    suite_index: usize,
    case_index: usize,
) -> usize {
    let earlier_tasks: usize = question.tasks[..task_index]
        .iter()
        .map(Task::test_case_count)
        .sum();
    let earlier_suites: usize = question.tasks[task_index].test_suites[..suite_index]
        .iter()
        .map(|s| s.test_cases.len())
        .sum();
    earlier_tasks + earlier_suites + case_index
}

/// Classify one task's results across every test category.
pub fn evaluate_task(
    task_index: usize,
    task: &Task,
    run: &CodeRunResult,
    submitted_code: &str,
) -> TaskEvaluation {
    let mut evaluation = TaskEvaluation::unsolved(task_index);

    classify_suites(task_index, task, run, &mut evaluation);
    classify_buggy_tests(task_index, task, run, &mut evaluation);

    for (test_index, test) in task.suite_level_tests.iter().enumerate() {
        if test.conditions_met(&evaluation.passing_suite_ids) {
            evaluation.triggered_suite_level_tests.push(test_index);
        }
    }

    classify_performance(task_index, task, run, &mut evaluation);

    for (test_index, test) in task.style_tests.iter().enumerate() {
        let observed = style::run_check(&test.evaluation_function_name, submitted_code);
        if observed != test.expected_output {
            evaluation.style_failures.push(StyleFailure {
                test_index,
                message: test.message.clone(),
                observed_output: observed,
            });
        }
    }

    evaluation.solved = evaluation.passing_suite_ids.len() == task.test_suites.len()
        && evaluation.triggered_buggy_tests.is_empty();
    evaluation
}

fn classify_suites(
    task_index: usize,
    task: &Task,
    run: &CodeRunResult,
    evaluation: &mut TaskEvaluation,
) {
    for (suite_index, suite) in task.test_suites.iter().enumerate() {
        let mut failing_case = None;
        for (case_index, case) in suite.test_cases.iter().enumerate() {
            let observed = run.observed_output(task_index, suite_index, case_index);
            let passed = observed.is_some_and(|o| case.matches_output(o));
            if !passed {
                failing_case = Some((case_index, observed.cloned()));
                break;
            }
        }

        match failing_case {
            None => evaluation.passing_suite_ids.push(suite.id.clone()),
            Some((case_index, observed_output)) => {
                if evaluation.first_failure.is_none() {
                    evaluation.first_failure = Some(FirstFailure {
                        suite_id: suite.id.clone(),
                        suite_index,
                        case_index,
                        observed_output,
                    });
                }
            }
        }
    }
}

fn classify_buggy_tests(
    task_index: usize,
    task: &Task,
    run: &CodeRunResult,
    evaluation: &mut TaskEvaluation,
) {
    for (test_index, test) in task.buggy_output_tests.iter().enumerate() {
        let harness_matched = run
            .buggy_output_results
            .get(task_index)
            .and_then(|results| results.get(test_index))
            .copied()
            .unwrap_or(false);
        // A test whose ignore list covers every suite has nothing to
        // compare against and can never trigger.
        let has_comparable_suite = task
            .test_suites
            .iter()
            .any(|suite| !test.ignored_test_suite_ids.contains(&suite.id));
        if harness_matched && has_comparable_suite {
            evaluation.triggered_buggy_tests.push(test_index);
        }
    }
}

fn classify_performance(
    task_index: usize,
    task: &Task,
    run: &CodeRunResult,
    evaluation: &mut TaskEvaluation,
) {
    for (test_index, test) in task.performance_tests.iter().enumerate() {
        let observed = run
            .performance_results
            .get(task_index)
            .and_then(|results| results.get(test_index))
            .map(String::as_str)
            .unwrap_or("unknown");
        if observed != test.expected_performance {
            evaluation.performance_mismatches.push(PerformanceMismatch {
                test_index,
                expected: test.expected_performance.clone(),
                observed: observed.to_string(),
            });
        }
    }
}
