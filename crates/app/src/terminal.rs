//! Line-oriented rendering and input for an interactive quiz.

use std::io::{self, BufRead};
use std::thread;

use quiz_core::Completion;
use quiz_core::model::AnswerId;
use services::{QuestionView, SessionCommand, SessionObserver};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::time_fmt::{format_countdown, is_low_time};

pub const HELP: &str = "[1-9] choose  [n] next  [p] previous  [f] finish  [q] quit";

/// Prints session updates to stdout and publishes the current option ids for
/// the input reader.
pub struct TerminalObserver {
    options: watch::Sender<Vec<AnswerId>>,
    remaining_seconds: u32,
}

impl TerminalObserver {
    #[must_use]
    pub fn new(options: watch::Sender<Vec<AnswerId>>, remaining_seconds: u32) -> Self {
        Self {
            options,
            remaining_seconds,
        }
    }
}

impl SessionObserver for TerminalObserver {
    fn question_changed(&mut self, view: &QuestionView) {
        println!();
        println!(
            "Question {} of {}  [{}%]  time left {}",
            view.number,
            view.total,
            view.progress_percent,
            format_countdown(self.remaining_seconds)
        );
        println!("{}", view.prompt);
        for (position, option) in view.options.iter().enumerate() {
            let marker = if option.selected { "(*)" } else { "( )" };
            println!("  {} {marker} {}", position + 1, option.text);
        }
        let next_label = if view.is_last { "finish test" } else { "next" };
        if view.can_advance {
            println!("[n] {next_label}");
        } else {
            println!("choose an answer to continue");
        }

        let ids = view.options.iter().map(|option| option.id.clone()).collect();
        self.options.send_replace(ids);
    }

    fn remaining_changed(&mut self, remaining_seconds: u32) {
        self.remaining_seconds = remaining_seconds;
        let on_minute = remaining_seconds % 60 == 0 && remaining_seconds > 0;
        if on_minute || remaining_seconds <= 10 {
            let warn = if is_low_time(remaining_seconds) { " !" } else { "" };
            println!("time left {}{warn}", format_countdown(remaining_seconds));
        }
    }

    fn completed(&mut self, completion: &Completion) {
        println!();
        println!("Test completed: {}", completion.test_title);
        println!(
            "Your score: {} ({} of {} correct)",
            completion.score, completion.correct, completion.total
        );
    }
}

/// Maps one line of user input onto a command.
///
/// Numbers pick an option of the question currently shown, 1-based.
#[must_use]
pub fn parse_input(line: &str, options: &[AnswerId]) -> Option<SessionCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "n" | "next" => Some(SessionCommand::Next),
        "p" | "prev" => Some(SessionCommand::Prev),
        "f" | "finish" => Some(SessionCommand::Finish),
        "q" | "quit" => Some(SessionCommand::Quit),
        other => {
            let position: usize = other.parse().ok()?;
            let index = position.checked_sub(1)?;
            options
                .get(index)
                .cloned()
                .map(SessionCommand::SelectAnswer)
        }
    }
}

/// Reads stdin on its own thread and sends each line over `lines`.
///
/// The thread is detached. A read still pending when the session ends does
/// not hold up process exit.
///
/// # Errors
///
/// Returns the OS error if the thread cannot be spawned.
pub fn spawn_stdin_reader(lines: mpsc::Sender<String>) -> io::Result<()> {
    thread::Builder::new()
        .name("stdin-reader".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        debug!(%err, "stdin closed");
                        break;
                    }
                };
                if lines.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

/// Forwards parsed input lines until input ends or the session stops
/// listening. Ending input drops the sender, which the runner treats as
/// navigating away.
pub async fn forward_input(
    mut lines: mpsc::Receiver<String>,
    options: watch::Receiver<Vec<AnswerId>>,
    commands: mpsc::Sender<SessionCommand>,
) {
    while let Some(line) = lines.recv().await {
        let command = parse_input(&line, &options.borrow());
        match command {
            Some(command) => {
                if commands.send(command).await.is_err() {
                    break;
                }
            }
            None => println!("{HELP}"),
        }
    }
}
