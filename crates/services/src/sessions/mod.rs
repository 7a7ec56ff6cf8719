mod runner;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use runner::{RunOutcome, SessionCommand, SessionObserver, SessionRunner};
pub use view::{AnswerOption, QuestionView};
pub use workflow::QuizService;
