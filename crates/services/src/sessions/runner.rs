use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use quiz_core::model::AnswerId;
use quiz_core::{Completion, QuizSession, SessionEvent};

use super::view::QuestionView;
use crate::countdown::Countdown;
use crate::error::SessionError;

/// Input from the question renderer or the host shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SelectAnswer(AnswerId),
    Next,
    Prev,
    /// Submit early and score what has been answered.
    Finish,
    /// Navigate away without completing.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(Completion),
    Abandoned,
}

/// Receives session updates for display.
///
/// All methods default to doing nothing so hosts only implement what they
/// render.
pub trait SessionObserver: Send {
    fn question_changed(&mut self, _view: &QuestionView) {}

    fn remaining_changed(&mut self, _remaining_seconds: u32) {}

    fn completed(&mut self, _completion: &Completion) {}
}

/// Hosts one session: owns its countdown, feeds it commands and ticks, and
/// forwards the resulting events to an observer.
#[derive(Debug)]
pub struct SessionRunner {
    session: QuizSession,
    tick_period: Duration,
}

impl SessionRunner {
    #[must_use]
    pub fn new(session: QuizSession) -> Self {
        Self {
            session,
            tick_period: Duration::from_secs(1),
        }
    }

    /// Wall-clock length of one countdown second.
    #[must_use]
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    /// Runs the session until it completes or the host navigates away.
    ///
    /// A closed command channel counts as navigating away. The countdown is
    /// cancelled before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session has already completed
    /// and `SessionError::TimerStopped` if the countdown ends on its own.
    pub async fn run<O>(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        observer: &mut O,
    ) -> Result<RunOutcome, SessionError>
    where
        O: SessionObserver + ?Sized,
    {
        if self.session.is_complete() {
            return Err(SessionError::Completed);
        }
        if !self.session.is_running() {
            self.session.start();
        }
        self.publish(observer);

        let mut countdown = Countdown::spawn(self.tick_period);
        let result = loop {
            tokio::select! {
                tick = countdown.tick() => {
                    if tick.is_none() {
                        warn!(session = %self.session.session_id(), "countdown stopped early");
                        break Err(SessionError::TimerStopped);
                    }
                    self.session.tick();
                }
                command = commands.recv() => match command {
                    Some(SessionCommand::Quit) | None => {
                        info!(session = %self.session.session_id(), "session abandoned");
                        break Ok(RunOutcome::Abandoned);
                    }
                    Some(command) => self.apply(command),
                },
            }

            self.publish(observer);
            if let Some(completion) = self.session.completion() {
                break Ok(RunOutcome::Completed(completion.clone()));
            }
        };

        countdown.cancel();
        result
    }

    fn apply(&mut self, command: SessionCommand) {
        debug!(session = %self.session.session_id(), ?command, "command received");
        let applied = match command {
            SessionCommand::SelectAnswer(answer) => self.session.select_answer(answer),
            SessionCommand::Next => self.session.next(),
            SessionCommand::Prev => self.session.prev(),
            SessionCommand::Finish => self.session.finish().is_some(),
            SessionCommand::Quit => false,
        };
        if !applied {
            debug!(session = %self.session.session_id(), "command had no effect");
        }
    }

    fn publish<O>(&mut self, observer: &mut O)
    where
        O: SessionObserver + ?Sized,
    {
        let events = self.session.drain_events();
        // Views are built from current state, so only the newest change is rendered.
        let last_question_change = events
            .iter()
            .rposition(|event| matches!(event, SessionEvent::QuestionChanged { .. }));

        for (position, event) in events.into_iter().enumerate() {
            match event {
                SessionEvent::QuestionChanged { .. } => {
                    if Some(position) != last_question_change {
                        continue;
                    }
                    if let Some(view) = QuestionView::from_session(&self.session) {
                        observer.question_changed(&view);
                    }
                }
                SessionEvent::RemainingChanged { remaining_seconds } => {
                    observer.remaining_changed(remaining_seconds);
                }
                SessionEvent::Completed(completion) => observer.completed(&completion),
            }
        }
    }
}
