//! Mood-aware music suggestions from a chat conversation.
//!
//! Each chat message is sent to a language model that names the user's mood,
//! songs for that mood are pulled from a regional catalogue (JioSaavn) and a
//! built-in international list, and the result is logged to a local history.
//!
//! Core modules:
//! - [`orchestrator`] - Runs one chat turn through the pipeline
//! - [`classifier`] - Mood classification and companion replies
//! - [`recommender`] - Merges regional and international songs
//! - [`history`] - Append-only SQLite history
//!
//! ### Supporting Modules
//!
//! - [`gemini`] - Gemini `generateContent` client
//! - [`saavn`] - JioSaavn search client
//! - [`catalog`] - Search terms and mock songs per mood
//! - [`mood`] - The mood label set and reply parsing
//! - [`song`] - Recommendation type and derived links
//! - [`config`] - Environment configuration and data directory management
//! - [`error`] - Error taxonomy
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use moodify::config::Config;
//! use moodify::orchestrator::Orchestrator;
//!
//! let config = Config::from_env()?;
//! let mut orchestrator = Orchestrator::from_config(&config)?;
//!
//! let response = orchestrator.handle_turn("I just got a promotion, feeling amazing!");
//! print!("{}", response.render());
//!
//! for record in orchestrator.recent_history(5)? {
//!     println!("{} {}", record.timestamp, record.mood);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`error::MoodifyResult`]. Only configuration
//! problems are fatal; upstream and storage failures degrade the answer instead
//! of aborting the turn.

pub mod catalog;
pub mod classifier;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod gemini;
pub mod history;
pub mod mood;
pub mod orchestrator;
pub mod recommender;
pub mod saavn;
pub mod song;
