#![forbid(unsafe_code)]

pub mod catalog;
pub mod countdown;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use catalog::CatalogService;
pub use countdown::Countdown;
pub use error::{CatalogError, SessionError};

pub use sessions::{
    AnswerOption, QuestionView, QuizService, RunOutcome, SessionCommand, SessionObserver,
    SessionRunner,
};
