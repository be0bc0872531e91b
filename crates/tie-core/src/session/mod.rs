//! A learner session: owns the question, its transcript, and drives the
//! submission pipeline end to end.
//!
//! The pipeline is a linear sequence of stages: prerequisite check, then
//! preprocessing, then one bounded execution on a blocking task, then
//! evaluation and feedback selection. One submission runs at a time; a
//! newer submission supersedes an in-flight one via a generation counter,
//! and the superseded result is discarded without recording a snapshot.

mod transcript;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use transcript::{Snapshot, Transcript};

use crate::config::SessionConfig;
use crate::error::{Result, TieError};
use crate::evaluation::{self, TaskEvaluation};
use crate::feedback::{self, reinforcement, Feedback, Reinforcement};
use crate::prereq::PrereqResult;
use crate::question::Question;
use crate::runner::{CodeRunResult, CodeRunner};
use crate::runtime::{LanguageRuntime, RuntimeRegistry};

/// Lifecycle of a session. `AwaitingSubmission` is re-entrant after each
/// rendered feedback; `SessionComplete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingSubmission,
    Evaluating,
    FeedbackRendered,
    TaskAdvanced,
    SessionComplete,
}

/// What one submission produced, for the caller to render.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub feedback: Feedback,
    pub reinforcement: Option<Reinforcement>,
    /// Learner print output for the first failing case, when one exists.
    pub stdout: Option<String>,
    pub state: SessionState,
    pub current_task_index: usize,
}

/// Lets callers invalidate an in-flight submission when a newer one
/// arrives (last-submission-wins).
#[derive(Clone)]
pub struct SupersedeHandle {
    generation: Arc<AtomicU64>,
}

impl SupersedeHandle {
    pub fn supersede(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Session {
    question: Arc<Question>,
    runtime: Arc<dyn LanguageRuntime>,
    runner: Arc<dyn CodeRunner>,
    config: SessionConfig,
    transcript: Transcript,
    state: SessionState,
    current_task_index: usize,
    generation: Arc<AtomicU64>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("current_task_index", &self.current_task_index)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(
        question: Question,
        registry: &RuntimeRegistry,
        runner: Arc<dyn CodeRunner>,
        config: SessionConfig,
    ) -> Result<Self> {
        crate::question::validate(&question)?;
        let runtime = registry.get(&question.language)?;
        Ok(Self {
            question: Arc::new(question),
            runtime,
            runner,
            config,
            transcript: Transcript::new(),
            state: SessionState::AwaitingSubmission,
            current_task_index: 0,
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_task_index(&self) -> usize {
        self.current_task_index
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn supersede_handle(&self) -> SupersedeHandle {
        SupersedeHandle {
            generation: Arc::clone(&self.generation),
        }
    }

    /// Position the session on a later task, as when resuming earlier
    /// progress. Clamped to the last task.
    pub fn resume_at_task(&mut self, task_index: usize) {
        if self.state == SessionState::SessionComplete {
            return;
        }
        self.current_task_index = task_index.min(self.question.tasks.len() - 1);
    }

    /// Back to the starting state with an empty transcript.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.state = SessionState::AwaitingSubmission;
        self.current_task_index = 0;
    }

    /// The UI acknowledged the rendered feedback; accept the next
    /// submission.
    pub fn acknowledge_feedback(&mut self) {
        if self.state != SessionState::SessionComplete {
            self.state = SessionState::AwaitingSubmission;
        }
    }

    /// Run the full pipeline for one submission.
    pub async fn submit(&mut self, submitted_code: &str) -> Result<SubmissionOutcome> {
        if self.state == SessionState::SessionComplete {
            return Err(TieError::SessionComplete);
        }
        self.state = SessionState::Evaluating;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(task = self.current_task_index, "submission received");

        let prereq = self
            .runtime
            .check_prerequisites(&self.question.starter_code, submitted_code);
        if let PrereqResult::Failed(kind) = prereq {
            tracing::debug!(?kind, "prerequisite check failed");
            return Ok(self.finish_prereq_failure(kind));
        }

        let program = self.runtime.preprocess(&self.question, submitted_code)?;
        let run = self.execute(program.clone()).await?;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("submission superseded, discarding result");
            self.state = SessionState::AwaitingSubmission;
            return Err(TieError::Superseded);
        }

        let evaluations = evaluation::evaluate_submission(&self.question, &run, submitted_code);
        let feedback = feedback::select_feedback(
            &self.question,
            &evaluations,
            self.current_task_index,
            &run,
            &program.separator,
            &self.transcript,
            self.config.execution_timeout_secs,
        );
        Ok(self.finish_evaluated(&evaluations, run, &program.separator, feedback))
    }

    /// One bounded execution on a blocking task. The runner may enforce
    /// its own limit; the timeout here also covers runners that cannot
    /// (the blocking task is left to finish on its own in that case).
    async fn execute(&self, program: crate::runtime::PreprocessedProgram) -> Result<CodeRunResult> {
        let runner = Arc::clone(&self.runner);
        let handle = tokio::task::spawn_blocking(move || runner.run(&program));
        match tokio::time::timeout(self.config.execution_timeout(), handle).await {
            Err(_elapsed) => Ok(CodeRunResult::timed_out()),
            Ok(Err(join_error)) => Err(TieError::runner(join_error.to_string())),
            Ok(Ok(result)) => result,
        }
    }

    fn finish_prereq_failure(
        &mut self,
        kind: crate::prereq::PrereqFailureKind,
    ) -> SubmissionOutcome {
        let feedback = feedback::messages::prereq_feedback(&kind);
        self.state = SessionState::FeedbackRendered;
        self.transcript.record_snapshot(Snapshot::new(
            Some(kind),
            None,
            feedback.clone(),
            None,
        ));
        SubmissionOutcome {
            feedback,
            reinforcement: None,
            stdout: None,
            state: self.state,
            current_task_index: self.current_task_index,
        }
    }

    fn finish_evaluated(
        &mut self,
        evaluations: &[TaskEvaluation],
        run: CodeRunResult,
        separator: &str,
        feedback: Feedback,
    ) -> SubmissionOutcome {
        let target = feedback::target_evaluation(evaluations, self.current_task_index);
        let reinforcement = target
            .filter(|e| !e.has_execution_error())
            .map(|e| {
                reinforcement::generate(
                    &self.question,
                    e,
                    &run,
                    self.transcript.most_recent_snapshot(),
                )
            });
        let stdout = failing_case_stdout(
            &self.question,
            evaluations,
            self.current_task_index,
            &run,
            separator,
        );

        self.apply_transition(evaluations, &feedback);
        self.transcript.record_snapshot(Snapshot::new(
            None,
            Some(run),
            feedback.clone(),
            reinforcement.clone(),
        ));

        SubmissionOutcome {
            feedback,
            reinforcement,
            stdout,
            state: self.state,
            current_task_index: self.current_task_index,
        }
    }

    fn apply_transition(&mut self, evaluations: &[TaskEvaluation], feedback: &Feedback) {
        let Some(target) = feedback::target_evaluation(evaluations, self.current_task_index)
        else {
            self.state = SessionState::FeedbackRendered;
            return;
        };

        let advanced = target.solved && target.performance_mismatches.is_empty();
        if advanced && feedback.is_answer_correct {
            if target.task_index + 1 == self.question.tasks.len() {
                self.current_task_index = target.task_index;
                self.state = SessionState::SessionComplete;
            } else {
                self.current_task_index = target.task_index + 1;
                self.state = SessionState::TaskAdvanced;
            }
        } else {
            // An earlier task regressing pulls the learner back to it.
            self.current_task_index = target.task_index;
            self.state = SessionState::FeedbackRendered;
        }
    }
}

fn failing_case_stdout(
    question: &Question,
    evaluations: &[TaskEvaluation],
    current_task_index: usize,
    run: &CodeRunResult,
    separator: &str,
) -> Option<String> {
    let evaluation = feedback::target_evaluation(evaluations, current_task_index)?;
    let failure = evaluation.first_failure.as_ref()?;
    let flat = evaluation::flat_case_index(
        question,
        evaluation.task_index,
        failure.suite_index,
        failure.case_index,
    );
    run.stdout_for_case(separator, flat)
        .filter(|s| !s.trim().is_empty())
}
