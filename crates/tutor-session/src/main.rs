use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use exchange_relay::{BrowserNavigator, HttpExchangeRelay};
use session_controller::{SessionController, SessionSettings};
use session_core::{
    session_key, ClockStorage, Config, Countdown, FileClockStorage, SessionClock,
    SubmissionGate, SystemWallClock, WallClock,
};
use session_watchdog::ActivitySignal;
use tokio::io::{AsyncBufReadExt, BufReader};

mod input;
mod logging;
mod terminal;

use input::{parse_input, Input};
use logging::init_logging;
use terminal::TerminalView;

#[derive(Parser)]
#[command(name = "tutor-session")]
#[command(about = "Timed chat session with a peer-tutor AI")]
#[command(version)]
struct Cli {
    /// Participant identifier scoping the session clock
    #[arg(long, env = "TUTOR_PARTICIPANT_ID")]
    participant: Option<String>,

    /// Tutoring backend base URL
    #[arg(long, env = "TUTOR_BACKEND_URL")]
    backend_url: Option<String>,

    /// Session budget in seconds
    #[arg(long)]
    budget_seconds: Option<u64>,

    /// Inactivity threshold in milliseconds
    #[arg(long)]
    inactivity_ms: Option<u64>,

    /// Directory holding persisted session start times
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat session
    Chat,
    /// Show remaining time and whether submission is open
    Status,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load();
        if let Some(participant) = &self.participant {
            config.participant_id = participant.clone();
        }
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(budget) = self.budget_seconds {
            config.budget_seconds = budget;
        }
        if let Some(ms) = self.inactivity_ms {
            config.inactivity_threshold_ms = ms;
        }
        if let Some(dir) = &self.storage_dir {
            config.storage_dir = Some(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = cli.config()?;
    log::debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::Chat => run_chat(config).await,
        Commands::Status => show_status(config).await,
    }
}

async fn run_chat(config: Config) -> anyhow::Result<()> {
    let storage = FileClockStorage::new(config.storage_dir());
    let wall: Arc<dyn WallClock> = Arc::new(SystemWallClock);
    let clock = SessionClock::initialize(
        &storage,
        &session_key(&config.participant_id),
        config.budget_seconds,
        wall.now_ms(),
    )
    .await
    .context("failed to load the session clock")?;

    let relay = Arc::new(HttpExchangeRelay::new(&config.backend_url)?);
    let controller = SessionController::new(
        SessionSettings::from(&config),
        clock,
        wall,
        relay,
        Arc::new(BrowserNavigator),
        TerminalView::new(),
    );
    let handle = controller.handle();
    let session = tokio::spawn(controller.run());

    println!(
        "{}",
        format!("🚀 Connected to {} as {}", config.backend_url, config.participant_id).cyan()
    );
    println!(
        "{}",
        "메시지를 입력하세요. /submit 제출, /quit 종료".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handle.activity(ActivitySignal::KeyPressed);
        let sent = match parse_input(&line) {
            Input::Quit => break,
            Input::Submit => handle.request_submission(),
            Input::Choose(action) => handle.choose(action),
            Input::Message(text) => handle.submit_message(text),
        };
        if !sent {
            break;
        }
    }

    handle.shutdown();
    session.await.context("session task failed")?;
    Ok(())
}

async fn show_status(config: Config) -> anyhow::Result<()> {
    let storage = FileClockStorage::new(config.storage_dir());
    let key = session_key(&config.participant_id);

    if storage.get(&key).await?.is_none() {
        println!("{}", format!("No session started for {}", config.participant_id).yellow());
        return Ok(());
    }

    let now = SystemWallClock.now_ms();
    let clock = SessionClock::initialize(&storage, &key, config.budget_seconds, now).await?;
    let countdown = Countdown::at(&clock, now);
    let gate = SubmissionGate::evaluate(&clock, now);

    println!("{}", countdown.label);
    println!(
        "Submission: {}",
        if gate.is_open() {
            "open".green()
        } else {
            "locked".yellow()
        }
    );
    Ok(())
}
