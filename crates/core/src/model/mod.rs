mod catalog;
mod definition;
mod ids;
mod question;
mod score;

pub use catalog::{CatalogFilter, Difficulty, DifficultyParseError, TestSummary, categories};
pub use definition::{TestDefinition, TestError};
pub use ids::{AnswerId, ParseIdError, QuestionId, SessionId, TestId};
pub use question::{Answer, Question, QuestionError};
pub use score::Score;
