//! # History Store
//!
//! Append-only log of `{timestamp, mood, recommendations}` kept in SQLite.
//!
//! Every operation opens its own connection, so concurrent chat sessions can
//! append and read at the same time; a single `INSERT` is atomic in SQLite and
//! record order is never corrupted. Recommendations are stored as a JSON array
//! (`[]` when empty) and the mood column only accepts the six known labels.

use crate::error::{MoodifyError, MoodifyResult};
use crate::mood::MoodLabel;
use crate::song::SongRecommendation;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use log::{debug, trace};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One finished chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub mood: MoodLabel,
    pub recommendations: Vec<SongRecommendation>,
}

impl HistoryRecord {
    /// A record stamped with the current time, at the microsecond precision
    /// the store keeps.
    #[must_use]
    pub fn new(mood: MoodLabel, recommendations: Vec<SongRecommendation>) -> Self {
        Self {
            timestamp: Utc::now().trunc_subsecs(6),
            mood,
            recommendations,
        }
    }
}

/// Persistent, append-only mood history.
pub trait HistoryStore {
    /// # Errors
    ///
    /// [`MoodifyError::Persistence`] when the record cannot be written.
    fn append(&self, record: &HistoryRecord) -> MoodifyResult<()>;

    /// Up to `n` records, most recent first.
    ///
    /// # Errors
    ///
    /// [`MoodifyError::Persistence`] when the store cannot be read.
    fn recent(&self, n: usize) -> MoodifyResult<Vec<HistoryRecord>>;
}

/// [`HistoryStore`] in a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteHistory {
    path: PathBuf,
}

impl SqliteHistory {
    /// Open (creating if needed) the database at `path` and make sure the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// [`MoodifyError::Persistence`] if the directory or schema cannot be created.
    pub fn open(path: &Path) -> MoodifyResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                MoodifyError::Persistence(format!(
                    "Failed to create history directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let store = Self {
            path: path.to_path_buf(),
        };
        store.init()?;
        debug!("History store ready at {}", path.display());
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> MoodifyResult<Connection> {
        let conn = Connection::open(&self.path).map_err(|e| {
            MoodifyError::Persistence(format!(
                "SQLite connection refused. DB location: {}: {e}",
                self.path.display()
            ))
        })?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    fn init(&self) -> MoodifyResult<()> {
        let labels: Vec<String> = MoodLabel::ALL.iter().map(|m| format!("'{m}'")).collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS history (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp       TEXT    NOT NULL,
                mood            TEXT    NOT NULL CHECK (mood IN ({})),
                recommendations TEXT    NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_history_timestamp ON history(timestamp);",
            labels.join(", ")
        );

        self.connect()?.execute_batch(&sql).map_err(|e| {
            MoodifyError::Persistence(format!("Invalid SQL when CREATEing history TABLE: {e}"))
        })
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// [`MoodifyError::Persistence`] when the store cannot be read.
    pub fn count(&self) -> MoodifyResult<usize> {
        let count: i64 = self
            .connect()?
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    // Fixed width so text ordering equals time ordering.
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_row(timestamp: &str, mood: &str, recommendations: &str) -> MoodifyResult<HistoryRecord> {
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| MoodifyError::Persistence(format!("Bad timestamp {timestamp:?}: {e}")))?
        .with_timezone(&Utc);
    let mood = mood
        .parse::<MoodLabel>()
        .map_err(|e| MoodifyError::Persistence(format!("Bad mood in history: {e}")))?;
    let recommendations = serde_json::from_str(recommendations)?;

    Ok(HistoryRecord {
        timestamp,
        mood,
        recommendations,
    })
}

impl HistoryStore for SqliteHistory {
    fn append(&self, record: &HistoryRecord) -> MoodifyResult<()> {
        let recommendations = serde_json::to_string(&record.recommendations)?;

        self.connect()?
            .execute(
                "INSERT INTO history (timestamp, mood, recommendations) VALUES (?1, ?2, ?3)",
                params![encode_timestamp(&record.timestamp), record.mood.as_str(), recommendations],
            )
            .map_err(|e| {
                MoodifyError::Persistence(format!("Invalid SQL statement when INSERTing record: {e}"))
            })?;

        trace!("Appended {} history record", record.mood);
        Ok(())
    }

    fn recent(&self, n: usize) -> MoodifyResult<Vec<HistoryRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, mood, recommendations FROM history
             ORDER BY timestamp DESC, id DESC
             LIMIT ?1",
        )?;

        let limit = i64::try_from(n).unwrap_or(i64::MAX);
        let rows = stmt.query_map([limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (timestamp, mood, recommendations) = row?;
            records.push(decode_row(&timestamp, &mood, &recommendations)?);
        }
        Ok(records)
    }
}
