use serde::{Deserialize, Serialize};

/// Which rule of the selection policy produced a piece of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    TimeLimitError,
    RuntimeError,
    KnownBugFailure,
    IncorrectOutputFailure,
    SuiteLevelFailure,
    PerformanceTestFailure,
    StyleTestFailure,
    PrerequisiteFailure,
    ServerError,
    Successful,
}

/// One block of rendered feedback. Paragraph kinds drive presentation:
/// code and output render monospaced, errors render as tracebacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedbackParagraph {
    Text { content: String },
    Code { content: String },
    Error { content: String },
    Output { content: String },
    Image { content: String },
}

impl FeedbackParagraph {
    pub fn content(&self) -> &str {
        match self {
            FeedbackParagraph::Text { content }
            | FeedbackParagraph::Code { content }
            | FeedbackParagraph::Error { content }
            | FeedbackParagraph::Output { content }
            | FeedbackParagraph::Image { content } => content,
        }
    }
}

/// Identifies the hint that produced a feedback, for the anti-repetition
/// rule: same category + same specific index on consecutive snapshots
/// advances to the next message in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSource {
    pub task_index: usize,
    pub category: FeedbackCategory,
    /// Which buggy test / failing suite / suite-level test within the
    /// category.
    pub specific_index: usize,
    /// Position within that hint's ordered message list.
    pub message_index: usize,
}

/// The single feedback artifact surfaced for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub paragraphs: Vec<FeedbackParagraph>,
    pub is_answer_correct: bool,
    pub category: FeedbackCategory,
    pub source: Option<FeedbackSource>,
}

impl Feedback {
    pub fn new(category: FeedbackCategory, is_answer_correct: bool) -> Self {
        Self {
            paragraphs: Vec::new(),
            is_answer_correct,
            category,
            source: None,
        }
    }

    pub fn with_source(mut self, source: FeedbackSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn add_text(&mut self, content: impl Into<String>) {
        self.paragraphs.push(FeedbackParagraph::Text {
            content: content.into(),
        });
    }

    pub fn add_code(&mut self, content: impl Into<String>) {
        self.paragraphs.push(FeedbackParagraph::Code {
            content: content.into(),
        });
    }

    pub fn add_error(&mut self, content: impl Into<String>) {
        self.paragraphs.push(FeedbackParagraph::Error {
            content: content.into(),
        });
    }

    pub fn add_output(&mut self, content: impl Into<String>) {
        self.paragraphs.push(FeedbackParagraph::Output {
            content: content.into(),
        });
    }
}
