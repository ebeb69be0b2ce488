//! # Moodify
//!
//! Terminal chat that detects your mood and suggests songs for it.
//!
//! ## Usage
//!
//! ```bash
//! # Chat (default command)
//! GEMINI_API_KEY=... moodify
//!
//! # Recent moods
//! moodify history --limit 10
//!
//! # Shell completions
//! moodify completion bash
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use moodify::cli::{self, Command};
use moodify::completion;
use moodify::config::{self, Config};
use moodify::history::{HistoryRecord, HistoryStore, SqliteHistory};
use moodify::orchestrator::Orchestrator;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const PROMPT: &str = "you> ";

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Interactive loop: one line in, one rendered response out. The session
/// transcript lives in the orchestrator for as long as the loop runs.
fn run_chat(db: Option<PathBuf>) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(db) = db {
        config = config.with_db_path(db);
    }
    debug!("{config:?}");

    let mut orchestrator = Orchestrator::from_config(&config).context("Failed to start Moodify")?;

    println!("Moodify - tell me how you're feeling (type 'exit' to quit)\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("{PROMPT}");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let text = line.trim();
        if is_exit(text) {
            break;
        }

        let response = orchestrator.handle_turn(text);
        println!("{}", response.render());
    }

    info!("Chat session ended");
    Ok(())
}

fn print_record(record: &HistoryRecord) {
    println!(
        "{}  {}",
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.mood
    );
    if record.recommendations.is_empty() {
        println!("    (no recommendations)");
    }
    for song in &record.recommendations {
        println!("    {} - {}", song.title, song.artist);
    }
}

/// History only needs the store, not the API key.
fn show_history(limit: usize, db: Option<PathBuf>) -> Result<()> {
    let path = match db {
        Some(path) => path,
        None => config::get_db_path().context("Failed to locate history database")?,
    };

    let store = SqliteHistory::open(&path)
        .with_context(|| format!("Failed to open history at {}", path.display()))?;
    let records = store.recent(limit).context("Failed to read history")?;

    if records.is_empty() {
        println!("No history yet. Start a chat with `moodify chat`.");
        return Ok(());
    }
    for record in &records {
        print_record(record);
    }
    Ok(())
}

/// Main entry point for the Moodify application.
///
/// Loads `.env`, initializes logging, parses command-line arguments, and
/// routes commands. Configuration problems propagate out of `main` as an
/// `anyhow` error with a non-zero exit.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodify` - Show pipeline state transitions
/// - `RUST_LOG=moodify::recommender=trace moodify` - Module-specific logging
fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = cli::Args::parse();

    match args.command_or_default() {
        Command::Chat { db } => run_chat(db)?,
        Command::History { limit, db } => show_history(limit, db)?,
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(
                completion::shell_to_completion_shell(shell),
                &mut cmd,
                &mut io::stdout(),
            );
        }
    }

    Ok(())
}
