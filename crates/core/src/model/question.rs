use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{AnswerId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {question} has an empty prompt")]
    EmptyPrompt { question: QuestionId },

    #[error("question {question} has an answer with an empty id")]
    EmptyAnswerId { question: QuestionId },

    #[error("question {question} lists answer {answer} more than once")]
    DuplicateAnswer {
        question: QuestionId,
        answer: AnswerId,
    },
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// One selectable option of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    id: AnswerId,
    text: String,
    is_correct: bool,
}

impl Answer {
    #[must_use]
    pub fn new(id: impl Into<AnswerId>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn id(&self) -> &AnswerId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A prompt with its answer options in display order.
///
/// Exactly one option is expected to be flagged correct, but that is left to
/// whoever authors the test data; scoring simply looks the selection up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    answers: Vec<Answer>,
}

impl Question {
    /// Creates a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if an identifier or the prompt is empty, or if
    /// two options share an identifier.
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        answers: Vec<Answer>,
    ) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }

        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt { question: id });
        }

        if answers.iter().any(|answer| answer.id.as_str().trim().is_empty()) {
            return Err(QuestionError::EmptyAnswerId { question: id });
        }
        let duplicate = {
            let mut seen = HashSet::with_capacity(answers.len());
            answers
                .iter()
                .find(|answer| !seen.insert(answer.id.as_str()))
                .map(|answer| answer.id.clone())
        };
        if let Some(answer) = duplicate {
            return Err(QuestionError::DuplicateAnswer {
                question: id,
                answer,
            });
        }

        Ok(Self {
            id,
            prompt,
            answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, id: &AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|answer| &answer.id == id)
    }

    /// True when `id` names an option of this question that is flagged correct.
    #[must_use]
    pub fn is_correct(&self, id: &AnswerId) -> bool {
        self.answer(id).is_some_and(Answer::is_correct)
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.is_correct)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<Answer> {
        vec![
            Answer::new("a", "var", false),
            Answer::new("b", "let", true),
            Answer::new("c", "variable", false),
        ]
    }

    #[test]
    fn question_keeps_display_order() {
        let q = Question::new("1", "Pick one", options()).unwrap();
        let ids: Vec<_> = q.answers().iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn is_correct_only_for_flagged_option() {
        let q = Question::new("1", "Pick one", options()).unwrap();
        assert!(q.is_correct(&AnswerId::from("b")));
        assert!(!q.is_correct(&AnswerId::from("a")));
        assert!(!q.is_correct(&AnswerId::from("zzz")));
        assert_eq!(q.correct_answer().map(Answer::text), Some("let"));
    }

    #[test]
    fn empty_id_is_rejected() {
        let err = Question::new("  ", "Pick one", options()).unwrap_err();
        assert_eq!(err, QuestionError::EmptyId);
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = Question::new("1", " ", options()).unwrap_err();
        assert!(matches!(err, QuestionError::EmptyPrompt { .. }));
    }

    #[test]
    fn duplicate_answer_ids_are_rejected() {
        let mut answers = options();
        answers.push(Answer::new("a", "again", false));
        let err = Question::new("1", "Pick one", answers).unwrap_err();
        assert_eq!(
            err,
            QuestionError::DuplicateAnswer {
                question: QuestionId::from("1"),
                answer: AnswerId::from("a"),
            }
        );
    }

    #[test]
    fn question_without_correct_option_is_allowed() {
        let q = Question::new("1", "Pick one", vec![Answer::new("a", "x", false)]).unwrap();
        assert!(q.correct_answer().is_none());
    }
}
