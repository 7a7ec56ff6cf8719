use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{QuestionId, TestId};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestError {
    #[error("test title cannot be empty")]
    EmptyTitle,

    #[error("test duration must be > 0 minutes")]
    InvalidDuration,

    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
}

/// Everything a quiz session needs to know about one test.
///
/// Built once when a session is set up and never mutated afterwards. An empty
/// question list is allowed; such a session scores 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDefinition {
    id: TestId,
    title: String,
    description: String,
    duration_minutes: u32,
    questions: Vec<Question>,
}

impl TestDefinition {
    /// Creates a test definition.
    ///
    /// # Errors
    ///
    /// Returns `TestError` if the title is blank, the duration is zero, or two
    /// questions share an identifier.
    pub fn new(
        id: TestId,
        title: impl Into<String>,
        description: impl Into<String>,
        duration_minutes: u32,
        questions: Vec<Question>,
    ) -> Result<Self, TestError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(TestError::EmptyTitle);
        }
        if duration_minutes == 0 {
            return Err(TestError::InvalidDuration);
        }

        if let Some(duplicate) = first_duplicate(&questions) {
            return Err(TestError::DuplicateQuestion(duplicate));
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            duration_minutes,
            questions,
        })
    }

    /// Returns a copy with a different time limit.
    ///
    /// # Errors
    ///
    /// Returns `TestError::InvalidDuration` if `minutes` is zero.
    pub fn with_duration_minutes(mut self, minutes: u32) -> Result<Self, TestError> {
        if minutes == 0 {
            return Err(TestError::InvalidDuration);
        }
        self.duration_minutes = minutes;
        Ok(self)
    }

    #[must_use]
    pub fn id(&self) -> TestId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

fn first_duplicate(questions: &[Question]) -> Option<QuestionId> {
    let mut seen = HashSet::with_capacity(questions.len());
    questions
        .iter()
        .map(Question::id)
        .find(|id| !seen.insert(*id))
        .cloned()
}
