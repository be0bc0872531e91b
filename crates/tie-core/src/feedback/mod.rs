//! Feedback selection policy: picks exactly one feedback artifact from a
//! submission's evaluation, in fixed priority order.
//!
//! Priority, highest first: execution error (timeout or runtime error),
//! triggered buggy-output test, triggered suite-level test, failing
//! correctness suite, performance mismatch, style finding, success. The
//! policy consults the transcript's most recent snapshot so that the same
//! hint is never repeated verbatim twice in a row; repeats advance through
//! the hint's ordered message list and clamp at the last entry.

pub mod messages;
pub mod reinforcement;
mod types;

pub use messages::CORRECTNESS_STATE_COUNT;
pub use reinforcement::{Reinforcement, ReinforcementCase, ReinforcementTag};
pub use types::{Feedback, FeedbackCategory, FeedbackParagraph, FeedbackSource};

use crate::evaluation::{self, TaskEvaluation};
use crate::question::Question;
use crate::runner::CodeRunResult;
use crate::session::Transcript;

/// Fallback when evaluation produced nothing usable; indicates a fault in
/// the pipeline, not in the submission.
pub fn server_error_feedback() -> Feedback {
    let mut feedback = Feedback::new(FeedbackCategory::ServerError, false);
    feedback.add_text(
        "A server error occurred while grading your code. Please try \
         submitting again.",
    );
    feedback
}

/// The evaluation feedback should talk about: the session's current task,
/// unless an earlier task regressed (evaluation stops there) or the run
/// errored out.
pub fn target_evaluation(
    evaluations: &[TaskEvaluation],
    current_task_index: usize,
) -> Option<&TaskEvaluation> {
    let last = evaluations.len().checked_sub(1)?;
    evaluations.get(current_task_index.min(last))
}

/// Select the single feedback artifact for one submission.
pub fn select_feedback(
    question: &Question,
    evaluations: &[TaskEvaluation],
    current_task_index: usize,
    run: &CodeRunResult,
    separator: &str,
    transcript: &Transcript,
    timeout_limit_secs: u64,
) -> Feedback {
    let Some(evaluation) = target_evaluation(evaluations, current_task_index) else {
        return server_error_feedback();
    };

    if evaluation.timed_out {
        return messages::timeout_feedback(timeout_limit_secs);
    }
    if let Some(error) = &evaluation.runtime_error {
        return messages::runtime_error_feedback(error, evaluation.error_input.as_ref());
    }

    if !evaluation.solved {
        return unsolved_feedback(question, evaluation, run, separator, transcript);
    }

    if let Some(mismatch) = evaluation.performance_mismatches.first() {
        let mut feedback = Feedback::new(FeedbackCategory::PerformanceTestFailure, false);
        feedback.add_text(messages::performance_message(
            &mismatch.expected,
            &mismatch.observed,
        ));
        return feedback.with_source(FeedbackSource {
            task_index: evaluation.task_index,
            category: FeedbackCategory::PerformanceTestFailure,
            specific_index: mismatch.test_index,
            message_index: 0,
        });
    }

    solved_feedback(question, evaluation)
}

fn unsolved_feedback(
    question: &Question,
    evaluation: &TaskEvaluation,
    run: &CodeRunResult,
    separator: &str,
    transcript: &Transcript,
) -> Feedback {
    let task = &question.tasks[evaluation.task_index];

    // Buggy tests tie-break by authoring order.
    if let Some(&buggy_index) = evaluation.triggered_buggy_tests.first() {
        let hint_messages = &task.buggy_output_tests[buggy_index].messages;
        return hint_feedback(
            FeedbackCategory::KnownBugFailure,
            evaluation.task_index,
            buggy_index,
            hint_messages,
            transcript,
        );
    }

    // Suite-level hints describe emergent patterns across the failing
    // suites and are more specific than the generic failing-case message,
    // so they take precedence over it.
    if let Some(&test_index) = evaluation.triggered_suite_level_tests.first() {
        let hint_messages = &task.suite_level_tests[test_index].messages;
        return hint_feedback(
            FeedbackCategory::SuiteLevelFailure,
            evaluation.task_index,
            test_index,
            hint_messages,
            transcript,
        );
    }

    if let Some(failure) = &evaluation.first_failure {
        let stage = next_message_index(
            transcript,
            FeedbackCategory::IncorrectOutputFailure,
            evaluation.task_index,
            failure.suite_index,
            CORRECTNESS_STATE_COUNT,
        );
        let case = &task.test_suites[failure.suite_index].test_cases[failure.case_index];
        let flat = evaluation::flat_case_index(
            question,
            evaluation.task_index,
            failure.suite_index,
            failure.case_index,
        );
        let case_stdout = run.stdout_for_case(separator, flat);

        let mut feedback = Feedback::new(FeedbackCategory::IncorrectOutputFailure, false);
        messages::incorrect_output_paragraphs(
            &mut feedback,
            stage,
            case,
            failure.observed_output.as_ref(),
            case_stdout.as_deref(),
        );
        return feedback.with_source(FeedbackSource {
            task_index: evaluation.task_index,
            category: FeedbackCategory::IncorrectOutputFailure,
            specific_index: failure.suite_index,
            message_index: stage,
        });
    }

    // Unsolved with no failing suite and no triggered test should not
    // happen; report it rather than mislabel the submission.
    server_error_feedback()
}

fn solved_feedback(question: &Question, evaluation: &TaskEvaluation) -> Feedback {
    let question_complete = evaluation.task_index + 1 == question.tasks.len();

    let mut feedback = if let Some(style) = evaluation.style_failures.first() {
        let mut feedback = Feedback::new(FeedbackCategory::StyleTestFailure, true);
        feedback.add_text(format!("One stylistic note: {}", style.message));
        feedback.with_source(FeedbackSource {
            task_index: evaluation.task_index,
            category: FeedbackCategory::StyleTestFailure,
            specific_index: style.test_index,
            message_index: 0,
        })
    } else {
        Feedback::new(FeedbackCategory::Successful, true)
    };

    if question_complete {
        feedback.add_text(messages::question_success_message());
    } else {
        feedback.add_text(messages::task_success_message());
    }
    feedback
}

fn hint_feedback(
    category: FeedbackCategory,
    task_index: usize,
    specific_index: usize,
    hint_messages: &[String],
    transcript: &Transcript,
) -> Feedback {
    let message_index = next_message_index(
        transcript,
        category,
        task_index,
        specific_index,
        hint_messages.len(),
    );
    let mut feedback = Feedback::new(category, false);
    feedback.add_text(hint_messages[message_index].clone());
    feedback.with_source(FeedbackSource {
        task_index,
        category,
        specific_index,
        message_index,
    })
}

/// Anti-repetition: when the previous snapshot's feedback came from the
/// same hint, advance one step through its message list, clamping at the
/// end.
fn next_message_index(
    transcript: &Transcript,
    category: FeedbackCategory,
    task_index: usize,
    specific_index: usize,
    message_count: usize,
) -> usize {
    debug_assert!(message_count > 0);
    let previous = transcript
        .most_recent_snapshot()
        .and_then(|snapshot| snapshot.feedback.source);
    match previous {
        Some(source)
            if source.category == category
                && source.task_index == task_index
                && source.specific_index == specific_index =>
        {
            (source.message_index + 1).min(message_count - 1)
        }
        _ => 0,
    }
}
