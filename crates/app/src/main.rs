use std::fmt;
use std::io::Write as _;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use services::{
    ApiConfig, CardApi, CardView, Feedback, HttpCardApi, InMemoryCardApi, SeedCard,
    SessionController, StatsView, StudyView,
};
use vocab_core::{CategoryName, StudyMode};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingCardSource,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingCardSource => {
                write!(f, "no card source: pass --api-url <url> or --builtin")
            }
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
    eprintln!("  cargo run -p app -- [--api-url <url>] [--builtin]");
    eprintln!();
    eprintln!("Card sources (--builtin wins when both are given):");
    eprintln!("  --api-url <url>   remote card server, e.g. http://localhost:5000");
    eprintln!("  --builtin         built-in starter deck, no server needed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_API_URL     default for --api-url");
}

enum CardSource {
    Remote(ApiConfig),
    Builtin,
}

struct Args {
    source: CardSource,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut config = ApiConfig::from_env();
        let mut builtin = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    config = Some(ApiConfig::new(value));
                }
                "--builtin" => builtin = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let source = if builtin {
            CardSource::Builtin
        } else {
            CardSource::Remote(config.ok_or(ArgsError::MissingCardSource)?)
        };
        Ok(Self { source })
    }
}

/// The starter deck served when no card server is configured.
fn starter_deck() -> Vec<SeedCard> {
    vec![
        SeedCard::new("labas", "hello (informal)", Some("LAH-bahs"), "01_greetings"),
        SeedCard::new("ačiū", "thank you|thanks", Some("AH-choo"), "01_greetings"),
        SeedCard::new("prašau", "please / you're welcome", Some("PRAH-shau"), "01_greetings"),
        SeedCard::new("taip", "yes", Some("tahp"), "03_basics"),
        SeedCard::new("ne", "no", Some("neh"), "03_basics"),
    ]
}

/// Terminal rendering of the study view.
///
/// Tracks the visible mode so the score line only appears in Test mode, the
/// same visibility rule a widget surface would apply.
struct TermView {
    mode: Mutex<StudyMode>,
}

impl TermView {
    fn new() -> Self {
        Self {
            mode: Mutex::new(StudyMode::default()),
        }
    }

    fn current_mode(&self) -> StudyMode {
        self.mode.lock().map(|mode| *mode).unwrap_or_default()
    }
}

impl StudyView for TermView {
    fn show_mode(&self, mode: StudyMode) {
        if let Ok(mut current) = self.mode.lock() {
            *current = mode;
        }
        println!("== {mode} mode ==");
    }

    fn show_categories(&self, categories: &[CategoryName]) {
        let names: Vec<&str> = categories.iter().map(CategoryName::as_str).collect();
        println!("categories: {}", names.join(", "));
    }

    fn show_card(&self, card: &CardView) {
        println!();
        println!("prompt: {}", card.prompt);
        if let Some(pronunciation) = &card.pronunciation {
            println!("pronunciation: {pronunciation}");
        }
        self.show_seen_count(card.seen_count);
    }

    fn show_answer(&self, answer: &str) {
        println!("answer: {answer}");
    }

    fn show_seen_count(&self, seen_count: u32) {
        println!("seen count (this card): {seen_count}");
    }

    fn show_feedback(&self, feedback: &Feedback) {
        match feedback {
            Feedback::Correct => println!("correct!"),
            Feedback::Incorrect { correct_answer } => {
                println!("nope. answer: {correct_answer}");
            }
        }
    }

    fn show_stats(&self, stats: &StatsView) {
        print!(
            "seen this session: {} | seen in category: {}/{}",
            stats.seen_this_session, stats.unique_seen_in_category, stats.total_in_category
        );
        if self.current_mode().is_test() {
            print!(" | score: {}", stats.score);
        }
        println!();
    }

    fn focus_answer_entry(&self) {
        // Nothing to focus on a line-based terminal.
    }

    fn show_fatal(&self, message: &str) {
        println!("prompt: {message}");
    }

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

fn print_commands() {
    println!("commands: reveal | next | answer <text> | mode learn|test | category <name> | stats | quit");
    println!("(in test mode, any other input is submitted as an answer)");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn event_loop(
    mut controller: SessionController,
    view: Arc<TermView>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    print_commands();
    prompt();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "quit" | "q" => break,
            "help" | "?" => print_commands(),
            "reveal" | "r" => {
                if let Err(err) = controller.reveal().await {
                    view.show_error(&err.to_string());
                }
            }
            "next" | "n" => {
                if let Err(err) = controller.load_next().await {
                    view.show_error(&err.to_string());
                }
            }
            "answer" | "a" => {
                if let Err(err) = controller.submit_answer(rest).await {
                    view.show_error(&err.to_string());
                }
            }
            "mode" | "m" => match rest.parse::<StudyMode>() {
                Ok(mode) => controller.switch_mode(mode).await,
                Err(err) => eprintln!("{err}"),
            },
            "category" | "cat" | "c" => {
                if rest.is_empty() {
                    eprintln!("category requires a name");
                } else if let Err(err) =
                    controller.switch_category(CategoryName::new(rest)).await
                {
                    view.show_error(&err.to_string());
                }
            }
            "stats" => {
                if let Err(err) = controller.refresh_stats().await {
                    view.show_error(&err.to_string());
                }
            }
            // The Enter-key path: in Test mode a bare line is a submission.
            _ if controller.session().mode().is_test() => {
                if let Err(err) = controller.submit_answer(line).await {
                    view.show_error(&err.to_string());
                }
            }
            other => eprintln!("unknown command: {other} (try 'help')"),
        }
        prompt();
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let api: Arc<dyn CardApi> = match parsed.source {
        CardSource::Builtin => {
            info!("using built-in starter deck");
            Arc::new(InMemoryCardApi::new(starter_deck()))
        }
        CardSource::Remote(config) => {
            info!(base_url = %config.base_url, "using remote card server");
            Arc::new(HttpCardApi::new(config))
        }
    };

    let view = Arc::new(TermView::new());
    let mut controller = SessionController::new(api, view.clone());
    controller.initialize().await;

    event_loop(controller, view).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
