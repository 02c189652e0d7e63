//! Newest-first move log for the current session.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument};

use crate::model::{Mark, Outcome};

/// Category tag used to style a log entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LogCategory {
    /// Move by seat X.
    XMove,
    /// Move by seat O.
    OMove,
    /// The game ended with a winner.
    Win,
    /// The game ended in a draw.
    Draw,
}

impl LogCategory {
    /// Move category for the given seat.
    pub fn for_mark(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::XMove,
            Mark::O => Self::OMove,
        }
    }

    /// Result category for the given outcome.
    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Winner(_) => Self::Win,
            Outcome::Draw => Self::Draw,
        }
    }

    /// Returns true for end-of-game entries.
    pub fn is_result(self) -> bool {
        matches!(self, Self::Win | Self::Draw)
    }
}

/// A single log line.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct LogEntry {
    /// Creation time in epoch milliseconds, unique within a log.
    id: i64,
    created_at: DateTime<Utc>,
    message: String,
    category: LogCategory,
}

/// Append-only log, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct GameLog {
    entries: VecDeque<LogEntry>,
    last_id: i64,
}

impl GameLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an entry and returns it.
    #[instrument(skip(self, message), fields(category = %category))]
    pub fn push(&mut self, message: impl Into<String>, category: LogCategory) -> &LogEntry {
        let created_at = Utc::now();
        // Two entries in the same millisecond still need distinct ids.
        let id = created_at.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;

        let entry = LogEntry {
            id,
            created_at,
            message: message.into(),
            category,
        };
        debug!(id, message = %entry.message, "Log entry added");
        self.entries.push_front(entry);
        &self.entries[0]
    }

    /// Drops every entry. Ids keep increasing across clears.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
