use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{AnswerId, TestId};
use quiz_core::time::fixed_clock;
use quiz_core::{Completion, CompletionReason, SessionOptions};
use services::{
    CatalogService, QuestionView, QuizService, RunOutcome, SessionCommand, SessionError,
    SessionObserver, SessionRunner,
};
use tokio::sync::mpsc;

#[derive(Default)]
struct Recorder {
    views: Vec<QuestionView>,
    remaining: Vec<u32>,
    completions: Vec<Completion>,
}

impl SessionObserver for Recorder {
    fn question_changed(&mut self, view: &QuestionView) {
        self.views.push(view.clone());
    }

    fn remaining_changed(&mut self, remaining_seconds: u32) {
        self.remaining.push(remaining_seconds);
    }

    fn completed(&mut self, completion: &Completion) {
        self.completions.push(completion.clone());
    }
}

fn quiz_service() -> QuizService {
    QuizService::new(fixed_clock(), Arc::new(CatalogService::embedded().unwrap()))
}

fn select(id: &str) -> SessionCommand {
    SessionCommand::SelectAnswer(AnswerId::from(id))
}

#[tokio::test(start_paused = true)]
async fn answering_every_question_completes_with_score() {
    let session = quiz_service().prepare_session(TestId::new(1)).unwrap();
    let (tx, rx) = mpsc::channel(16);
    for command in [
        select("b"),
        SessionCommand::Next,
        select("a"),
        SessionCommand::Next,
        select("a"),
        SessionCommand::Next,
    ] {
        tx.send(command).await.unwrap();
    }

    let mut recorder = Recorder::default();
    let outcome = SessionRunner::new(session)
        .run(rx, &mut recorder)
        .await
        .unwrap();

    let RunOutcome::Completed(completion) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(completion.score.value(), 67);
    assert_eq!(completion.correct, 2);
    assert_eq!(completion.test_title, "JavaScript Basics");
    assert_eq!(completion.reason, CompletionReason::LastQuestion);
    assert_eq!(recorder.completions, vec![completion]);
    assert_eq!(recorder.views.first().map(|v| v.number), Some(1));
    assert_eq!(recorder.views.last().map(|v| v.number), Some(3));
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_completes_exactly_once() {
    let session = quiz_service()
        .prepare_session_with_duration(TestId::new(1), Some(1))
        .unwrap();
    let (tx, rx) = mpsc::channel(1);

    let mut recorder = Recorder::default();
    let outcome = SessionRunner::new(session)
        .with_tick_period(Duration::from_secs(1))
        .run(rx, &mut recorder)
        .await
        .unwrap();
    drop(tx);

    let RunOutcome::Completed(completion) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(completion.reason, CompletionReason::TimeExpired);
    assert_eq!(completion.score.value(), 0);
    assert_eq!(recorder.completions.len(), 1);
    assert_eq!(recorder.remaining.first(), Some(&60));
    assert_eq!(recorder.remaining.last(), Some(&0));
    assert_eq!(recorder.remaining.len(), 61);
    assert!(recorder.remaining.windows(2).all(|w| w[1] == w[0] - 1));
}

#[tokio::test(start_paused = true)]
async fn ticks_and_clicks_interleave() {
    let session = quiz_service()
        .prepare_session_with_duration(TestId::new(1), Some(1))
        .unwrap();
    let (tx, rx) = mpsc::channel(4);

    let user = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        tx.send(select("b")).await.unwrap();
        tx.send(SessionCommand::Next).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        tx.send(SessionCommand::Finish).await.unwrap();
        tx
    });

    let mut recorder = Recorder::default();
    let outcome = SessionRunner::new(session)
        .run(rx, &mut recorder)
        .await
        .unwrap();
    drop(user.await.unwrap());

    let RunOutcome::Completed(completion) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(completion.reason, CompletionReason::Submitted);
    assert_eq!(completion.score.value(), 33);
    assert_eq!(recorder.remaining.last(), Some(&45));
    let second = recorder.views.last().unwrap();
    assert_eq!(second.number, 2);
    assert!(second.selected().is_none());
}

#[tokio::test(start_paused = true)]
async fn closing_commands_abandons_without_score() {
    let session = quiz_service().prepare_session(TestId::new(1)).unwrap();
    let (tx, rx) = mpsc::channel(4);
    tx.send(select("b")).await.unwrap();
    drop(tx);

    let mut recorder = Recorder::default();
    let outcome = SessionRunner::new(session)
        .run(rx, &mut recorder)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Abandoned);
    assert!(recorder.completions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn quit_abandons_running_session() {
    let session = quiz_service().prepare_session(TestId::new(1)).unwrap();
    let (tx, rx) = mpsc::channel(4);
    tx.send(SessionCommand::Quit).await.unwrap();

    let outcome = SessionRunner::new(session)
        .run(rx, &mut Recorder::default())
        .await
        .unwrap();
    assert_eq!(outcome, RunOutcome::Abandoned);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn required_answer_blocks_next_in_runner() {
    let service = quiz_service().with_options(SessionOptions {
        require_answer_to_advance: true,
    });
    let session = service.prepare_session(TestId::new(1)).unwrap();
    let (tx, rx) = mpsc::channel(8);
    for command in [SessionCommand::Next, SessionCommand::Next, SessionCommand::Quit] {
        tx.send(command).await.unwrap();
    }

    let mut recorder = Recorder::default();
    let outcome = SessionRunner::new(session)
        .run(rx, &mut recorder)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Abandoned);
    assert!(recorder.views.iter().all(|view| view.number == 1));
    assert!(recorder.views.iter().all(|view| !view.can_advance));
}

#[tokio::test]
async fn completed_session_cannot_be_run_again() {
    let mut session = quiz_service().prepare_session(TestId::new(1)).unwrap();
    session.start();
    session.finish();

    let (_tx, rx) = mpsc::channel(1);
    let err = SessionRunner::new(session)
        .run(rx, &mut Recorder::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Completed));
}
