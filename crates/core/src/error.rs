use thiserror::Error;

use crate::model::{DifficultyParseError, QuestionError, TestError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Test(#[from] TestError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyParseError),
}
