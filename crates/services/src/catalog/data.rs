//! Wire records for the embedded catalog and their mapping onto domain types.

use serde::Deserialize;

use quiz_core::model::{Answer, Difficulty, Question, TestId, TestSummary};

pub(crate) const EMBEDDED_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogRecord {
    pub tests: Vec<TestRecord>,
    #[serde(default)]
    pub question_sets: Vec<QuestionSetRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TestRecord {
    pub id: TestId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub questions_count: u32,
    pub duration_minutes: u32,
    #[serde(default)]
    pub rating: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionSetRecord {
    pub test_id: TestId,
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionRecord {
    pub id: String,
    pub text: String,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl From<TestRecord> for TestSummary {
    fn from(record: TestRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            difficulty: record.difficulty,
            category: record.category,
            questions_count: record.questions_count,
            duration_minutes: record.duration_minutes,
            rating: record.rating,
        }
    }
}

pub(crate) fn map_question(record: QuestionRecord) -> Result<Question, quiz_core::Error> {
    let answers = record
        .answers
        .into_iter()
        .map(|answer| Answer::new(answer.id, answer.text, answer.is_correct))
        .collect();
    Ok(Question::new(record.id, record.text, answers)?)
}
