//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `moodify` binary.
//!
//! ## Commands
//!
//! - `chat` (default): interactive mood chat, one recommendation per message
//! - `history`: recently detected moods and their songs
//! - `completion`: shell completion script
//!
//! ## Examples
//!
//! ```bash
//! moodify
//! moodify chat --db /tmp/moodify.db
//! moodify history --limit 10
//! moodify completion zsh > ~/.config/zsh/completions/_moodify
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Running without a subcommand starts the chat loop.
#[derive(Parser, Debug)]
#[command(name = "moodify")]
#[command(about = "Moodify: tell it how you feel, get songs that fit")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start an interactive chat
    ///
    /// Each message is classified into a mood, matched with regional and
    /// international songs, and saved to history. Type `exit` or `quit`
    /// (or send EOF) to leave.
    Chat {
        /// History database location (overrides MOODIFY_DB_PATH)
        #[arg(long, env = "MOODIFY_DB_PATH")]
        db: Option<PathBuf>,
    },

    /// Show recent mood history, most recent first
    History {
        /// Number of entries to show (at least 1)
        #[arg(
            short = 'n',
            long,
            default_value = "5",
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        limit: usize,

        /// History database location (overrides MOODIFY_DB_PATH)
        #[arg(long, env = "MOODIFY_DB_PATH")]
        db: Option<PathBuf>,
    },

    /// Generate shell completions
    ///
    /// Outputs completion script for the specified shell to stdout.
    /// Redirect to appropriate file for your shell.
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

impl Args {
    /// The subcommand to run, `chat` when none was given.
    #[must_use]
    pub fn command_or_default(self) -> Command {
        self.command.unwrap_or(Command::Chat { db: None })
    }
}
