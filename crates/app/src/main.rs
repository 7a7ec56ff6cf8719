use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::SessionOptions;
use quiz_core::model::{CatalogFilter, Difficulty, TestId};
use services::{CatalogService, Clock, QuizService, RunOutcome, SessionRunner};
use tokio::sync::{mpsc, watch};
use tracing::info;

mod telemetry;
mod terminal;
mod time_fmt;

use terminal::{HELP, TerminalObserver, forward_input, spawn_stdin_reader};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTestId { raw: String },
    InvalidDifficulty { raw: String },
    InvalidMinutes { raw: String },
    InvalidTickMs { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTestId { raw } => write!(f, "invalid --test-id value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw}")
            }
            ArgsError::InvalidMinutes { raw } => write!(f, "invalid --minutes value: {raw}"),
            ArgsError::InvalidTickMs { raw } => write!(f, "invalid --tick-ms value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- list [--category <name>] [--difficulty <level>]");
    eprintln!("  cargo run -p app -- take [--test-id <id>] [--minutes <n>] [--tick-ms <n>]");
    eprintln!();
    eprintln!("Defaults for take:");
    eprintln!("  --test-id 1");
    eprintln!("  --minutes  (the test's own time limit)");
    eprintln!("  --tick-ms 1000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_CATEGORY, QUIZ_DIFFICULTY, QUIZ_TEST_ID, QUIZ_MINUTES, QUIZ_TICK_MS");
    eprintln!("  RUST_LOG (log filter, default: warn)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    List,
    Take,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "list" => Some(Self::List),
            "take" => Some(Self::Take),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ListArgs {
    filter: CatalogFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TakeArgs {
    test_id: TestId,
    minutes: Option<u32>,
    tick: Duration,
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_difficulty(raw: String) -> Result<Difficulty, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidDifficulty { raw })
}

fn parse_minutes(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ArgsError::InvalidMinutes { raw }),
    }
}

fn parse_tick(raw: String) -> Result<Duration, ArgsError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ArgsError::InvalidTickMs { raw }),
    }
}

impl ListArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut filter = CatalogFilter::all();
        if let Some(category) = env_value("QUIZ_CATEGORY") {
            filter.category = Some(category);
        }
        if let Some(raw) = env_value("QUIZ_DIFFICULTY") {
            filter.difficulty = Some(parse_difficulty(raw)?);
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--category" => {
                    filter.category = Some(require_value(args, "--category")?);
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    filter.difficulty = Some(parse_difficulty(value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { filter })
    }
}

impl TakeArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut test_id = match env_value("QUIZ_TEST_ID") {
            Some(raw) => raw.parse().map_err(|_| ArgsError::InvalidTestId { raw })?,
            None => TestId::new(1),
        };
        let mut minutes = env_value("QUIZ_MINUTES").map(parse_minutes).transpose()?;
        let mut tick = env_value("QUIZ_TICK_MS")
            .map(parse_tick)
            .transpose()?
            .unwrap_or(Duration::from_secs(1));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--test-id" => {
                    let value = require_value(args, "--test-id")?;
                    test_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTestId { raw: value.clone() })?;
                }
                "--minutes" => {
                    minutes = Some(parse_minutes(require_value(args, "--minutes")?)?);
                }
                "--tick-ms" => {
                    tick = parse_tick(require_value(args, "--tick-ms")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            test_id,
            minutes,
            tick,
        })
    }
}

fn list(catalog: &CatalogService, args: &ListArgs) {
    let tests = catalog.filtered(&args.filter);
    println!("Categories: {}", catalog.categories().join(", "));
    println!(
        "Difficulties: {}",
        Difficulty::ALL.map(|level| level.label()).join(", ")
    );
    println!();
    if tests.is_empty() {
        println!("No tests match the selected filters.");
        return;
    }
    for test in tests {
        println!(
            "#{:<3} {}  [{} | {}]  {} questions, {} min, rating {:.1}",
            test.id.value(),
            test.title,
            test.category,
            test.difficulty,
            test.questions_count,
            test.duration_minutes,
            test.rating
        );
        println!("      {}", test.description);
    }
}

/// Runs one test, reading user input from `lines`.
async fn take(
    catalog: Arc<CatalogService>,
    args: &TakeArgs,
    mut lines: mpsc::Receiver<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Mirror the quiz page: "Next" stays disabled until an answer is chosen.
    let options = SessionOptions {
        require_answer_to_advance: true,
    };
    let service = QuizService::new(Clock::default_clock(), catalog).with_options(options);
    let session = service.prepare_session_with_duration(args.test_id, args.minutes)?;

    let remaining_seconds = session.remaining_seconds();
    let test = session.test();
    println!("{}", test.title());
    println!("{}", test.description());
    println!(
        "{} minutes, {} questions",
        test.duration_minutes(),
        test.question_count()
    );
    println!("Press Enter to start the test (Ctrl-D to leave).");

    if lines.recv().await.is_none() {
        return Ok(());
    }
    println!("{HELP}");

    let (options_tx, options_rx) = watch::channel(Vec::new());
    let (commands_tx, commands_rx) = mpsc::channel(16);
    let input = tokio::spawn(forward_input(lines, options_rx, commands_tx));

    let mut observer = TerminalObserver::new(options_tx, remaining_seconds);
    let outcome = SessionRunner::new(session)
        .with_tick_period(args.tick)
        .run(commands_rx, &mut observer)
        .await;
    input.abort();

    match outcome? {
        RunOutcome::Completed(completion) => {
            info!(score = completion.score.value(), "test finished");
        }
        RunOutcome::Abandoned => println!("Left the test without finishing."),
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: list the catalog when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::List,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::List,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let catalog = Arc::new(CatalogService::embedded()?);

    match cmd {
        Command::List => {
            let parsed = ListArgs::parse(&mut iter).inspect_err(|e| {
                eprintln!("{e}");
                print_usage();
            })?;
            list(&catalog, &parsed);
            Ok(())
        }
        Command::Take => {
            let parsed = TakeArgs::parse(&mut iter).inspect_err(|e| {
                eprintln!("{e}");
                print_usage();
            })?;
            let (lines_tx, lines) = mpsc::channel(16);
            spawn_stdin_reader(lines_tx)?;
            take(catalog, &parsed, lines).await
        }
    }
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| (*s).to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn list_args_build_filter() {
        let parsed =
            ListArgs::parse(&mut args(&["--category", "Backend", "--difficulty", "expert"]))
                .unwrap();
        assert_eq!(parsed.filter.category.as_deref(), Some("Backend"));
        assert_eq!(parsed.filter.difficulty, Some(Difficulty::Expert));
    }

    #[test]
    fn list_args_reject_unknown_difficulty() {
        let err = ListArgs::parse(&mut args(&["--difficulty", "legendary"])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidDifficulty { .. }));
    }

    #[test]
    fn take_args_parse_overrides() {
        let parsed = TakeArgs::parse(&mut args(&[
            "--test-id",
            "1",
            "--minutes",
            "2",
            "--tick-ms",
            "250",
        ]))
        .unwrap();
        assert_eq!(parsed.test_id, TestId::new(1));
        assert_eq!(parsed.minutes, Some(2));
        assert_eq!(parsed.tick, Duration::from_millis(250));
    }

    #[test]
    fn take_args_reject_zero_minutes() {
        let err = TakeArgs::parse(&mut args(&["--minutes", "0"])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidMinutes { .. }));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = TakeArgs::parse(&mut args(&["--test-id"])).unwrap_err();
        assert_eq!(err.to_string(), "--test-id requires a value");
    }

    fn quick_take() -> TakeArgs {
        TakeArgs {
            test_id: TestId::new(1),
            minutes: Some(1),
            tick: Duration::from_millis(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn take_returns_when_time_runs_out_with_input_open() {
        let catalog = Arc::new(CatalogService::embedded().unwrap());
        let (lines_tx, lines) = mpsc::channel(16);
        lines_tx.send(String::new()).await.unwrap();

        tokio::time::timeout(
            Duration::from_secs(600),
            take(catalog, &quick_take(), lines),
        )
        .await
        .expect("take should finish once the countdown expires")
        .unwrap();

        // Input stays open for the whole session.
        drop(lines_tx);
    }

    #[tokio::test(start_paused = true)]
    async fn take_without_start_line_leaves_quietly() {
        let catalog = Arc::new(CatalogService::embedded().unwrap());
        let (lines_tx, lines) = mpsc::channel(16);
        drop(lines_tx);

        take(catalog, &quick_take(), lines).await.unwrap();
    }

    #[test]
    fn subcommands_are_recognized() {
        assert_eq!(Command::from_arg("list"), Some(Command::List));
        assert_eq!(Command::from_arg("take"), Some(Command::Take));
        assert_eq!(Command::from_arg("seed"), None);
    }
}
