//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::TestId;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("no test with id {0}")]
    UnknownTest(TestId),
    #[error("test {0} is listed more than once")]
    DuplicateTest(TestId),
    #[error("test {0} has no published questions")]
    NoQuestions(TestId),
    #[error("malformed catalog data")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] quiz_core::Error),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already completed")]
    Completed,
    #[error("countdown stopped while the session was running")]
    TimerStopped,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Test(#[from] quiz_core::model::TestError),
}
