use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, trace};

use crate::model::{AnswerId, Question, QuestionId, Score, SessionId, TestDefinition};
use crate::time::Clock;

//
// ─── PHASE & EVENTS ────────────────────────────────────────────────────────────
//

/// Coarse lifecycle of a session. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionPhase {
    NotStarted,
    Running,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// `next()` was called on the last question.
    LastQuestion,
    /// The countdown reached zero.
    TimeExpired,
    /// The host called `finish()` directly.
    Submitted,
}

/// The one-time result handed to the host when a session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub session_id: SessionId,
    pub test_title: String,
    pub score: Score,
    pub correct: usize,
    pub total: usize,
    pub reason: CompletionReason,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Observable changes, queued until the host drains them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    QuestionChanged {
        index: usize,
        selected: Option<AnswerId>,
    },
    RemainingChanged {
        remaining_seconds: u32,
    },
    Completed(Completion),
}

/// Behavior switches fixed at session creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// When set, `next()` is ignored until the current question has an answer.
    pub require_answer_to_advance: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Timed walk through one test.
///
/// Every operation is a synchronous state change. Calls that arrive in the
/// wrong phase (a click queued just as the timer expires, a tick delivered
/// after completion) are ignored and reported as `false`/`None` rather than
/// treated as errors.
///
/// The session owns no timer. Whoever hosts it calls [`QuizSession::tick`]
/// once per elapsed second while it is running.
pub struct QuizSession {
    id: SessionId,
    test: TestDefinition,
    options: SessionOptions,
    clock: Clock,
    phase: SessionPhase,
    current: usize,
    answers: HashMap<QuestionId, AnswerId>,
    remaining_seconds: u32,
    started_at: Option<DateTime<Utc>>,
    completion: Option<Completion>,
    events: Vec<SessionEvent>,
}

impl QuizSession {
    #[must_use]
    pub fn new(test: TestDefinition, clock: Clock) -> Self {
        Self::with_options(test, clock, SessionOptions::default())
    }

    #[must_use]
    pub fn with_options(test: TestDefinition, clock: Clock, options: SessionOptions) -> Self {
        let remaining_seconds = test.duration_seconds();
        Self {
            id: SessionId::generate(),
            test,
            options,
            clock,
            phase: SessionPhase::NotStarted,
            current: 0,
            answers: HashMap::new(),
            remaining_seconds,
            started_at: None,
            completion: None,
            events: Vec::new(),
        }
    }

    // ── accessors ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn test(&self) -> &TestDefinition {
        &self.test
    }

    #[must_use]
    pub fn options(&self) -> SessionOptions {
        self.options
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.test.question_count()
    }

    /// `None` only for a test without questions.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.test.questions().get(self.current)
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.question_count()
    }

    #[must_use]
    pub fn selected_answer(&self, question: &QuestionId) -> Option<&AnswerId> {
        self.answers.get(question)
    }

    #[must_use]
    pub fn current_selection(&self) -> Option<&AnswerId> {
        self.current_question()
            .and_then(|question| self.answers.get(question.id()))
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, AnswerId> {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completion(&self) -> Option<&Completion> {
        self.completion.as_ref()
    }

    /// Whether a `next()` call right now would be honoured.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.is_running()
            && (!self.options.require_answer_to_advance
                || self.current_question().is_none()
                || self.current_selection().is_some())
    }

    /// Takes every event queued since the previous call, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ── operations ─────────────────────────────────────────────────────────────

    /// `NotStarted` → `Running`. Ignored in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::NotStarted {
            debug!(session = %self.id, phase = ?self.phase, "start ignored");
            return false;
        }

        self.phase = SessionPhase::Running;
        self.current = 0;
        self.answers.clear();
        self.remaining_seconds = self.test.duration_seconds();
        self.started_at = Some(self.clock.now());

        info!(
            session = %self.id,
            test = %self.test.id(),
            questions = self.question_count(),
            seconds = self.remaining_seconds,
            "quiz session started"
        );

        self.push_question_changed();
        self.events.push(SessionEvent::RemainingChanged {
            remaining_seconds: self.remaining_seconds,
        });
        true
    }

    /// Records `answer` for the current question, replacing any earlier choice.
    ///
    /// The identifier is not checked against the question's options; an
    /// unknown one is stored and simply scores as incorrect.
    pub fn select_answer(&mut self, answer: impl Into<AnswerId>) -> bool {
        if !self.is_running() {
            debug!(session = %self.id, phase = ?self.phase, "answer ignored");
            return false;
        }
        let Some(question_id) = self.current_question().map(|q| q.id().clone()) else {
            return false;
        };

        let answer = answer.into();
        trace!(session = %self.id, question = %question_id, answer = %answer, "answer selected");
        self.answers.insert(question_id, answer);
        self.push_question_changed();
        true
    }

    /// Moves to the next question, or completes the session from the last one.
    pub fn next(&mut self) -> bool {
        if !self.is_running() {
            debug!(session = %self.id, phase = ?self.phase, "next ignored");
            return false;
        }
        if !self.can_advance() {
            debug!(session = %self.id, index = self.current, "next ignored without an answer");
            return false;
        }

        if self.current + 1 < self.question_count() {
            self.current += 1;
            trace!(session = %self.id, index = self.current, "moved to next question");
            self.push_question_changed();
        } else {
            self.complete(CompletionReason::LastQuestion);
        }
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.is_running() || self.current == 0 {
            return false;
        }
        self.current -= 1;
        trace!(session = %self.id, index = self.current, "moved to previous question");
        self.push_question_changed();
        true
    }

    /// One elapsed second. Completes the session when the countdown hits zero.
    ///
    /// Ticks outside `Running` leave the session untouched.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            trace!(session = %self.id, phase = ?self.phase, "tick ignored");
            return false;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.events.push(SessionEvent::RemainingChanged {
            remaining_seconds: self.remaining_seconds,
        });
        if self.remaining_seconds == 0 {
            self.complete(CompletionReason::TimeExpired);
        }
        true
    }

    /// Scores and completes a running session.
    ///
    /// Returns the completion only from the call that produced it; later
    /// calls return `None` and emit nothing.
    pub fn finish(&mut self) -> Option<Completion> {
        if !self.is_running() {
            debug!(session = %self.id, phase = ?self.phase, "finish ignored");
            return None;
        }
        Some(self.complete(CompletionReason::Submitted))
    }

    // ── internals ──────────────────────────────────────────────────────────────

    fn correct_count(&self) -> usize {
        self.test
            .questions()
            .iter()
            .filter(|question| {
                self.answers
                    .get(question.id())
                    .is_some_and(|answer| question.is_correct(answer))
            })
            .count()
    }

    fn complete(&mut self, reason: CompletionReason) -> Completion {
        let total = self.question_count();
        let correct = self.correct_count();
        let completed_at = self.clock.now();
        let completion = Completion {
            session_id: self.id,
            test_title: self.test.title().to_string(),
            score: Score::from_ratio(correct, total),
            correct,
            total,
            reason,
            started_at: self.started_at.unwrap_or(completed_at),
            completed_at,
        };

        self.phase = SessionPhase::Completed;
        info!(
            session = %self.id,
            score = completion.score.value(),
            correct,
            total,
            reason = ?reason,
            "quiz session completed"
        );

        self.completion = Some(completion.clone());
        self.events.push(SessionEvent::Completed(completion.clone()));
        completion
    }

    fn push_question_changed(&mut self) {
        if self.current_question().is_none() {
            return;
        }
        self.events.push(SessionEvent::QuestionChanged {
            index: self.current,
            selected: self.current_selection().cloned(),
        });
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("test_id", &self.test.id())
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("remaining_seconds", &self.remaining_seconds)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
