use quiz_core::QuizSession;
use quiz_core::model::AnswerId;

/// One option as the question renderer shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: AnswerId,
    pub text: String,
    pub selected: bool,
}

/// Presentation-agnostic snapshot of the current question.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling decisions
///
/// The renderer decides how to show "Question 2 of 3", the progress bar, and
/// whether the last step reads "Next" or "Finish".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
    pub is_first: bool,
    pub is_last: bool,
    pub can_advance: bool,
    /// `number / total` as a whole percentage.
    pub progress_percent: u8,
}

impl QuestionView {
    /// `None` when the session's test has no questions.
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let question = session.current_question()?;
        let selected = session.current_selection();
        let number = session.current_index() + 1;
        let total = session.question_count();

        let options = question
            .answers()
            .iter()
            .map(|answer| AnswerOption {
                id: answer.id().clone(),
                text: answer.text().to_string(),
                selected: selected == Some(answer.id()),
            })
            .collect();

        Some(Self {
            number,
            total,
            prompt: question.prompt().to_string(),
            options,
            is_first: session.is_first(),
            is_last: session.is_last(),
            can_advance: session.can_advance(),
            progress_percent: u8::try_from(number * 100 / total).unwrap_or(100),
        })
    }

    #[must_use]
    pub fn selected(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.selected)
    }
}
