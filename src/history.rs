//! Query history: normalized queries, most recent first, persisted as JSON.

use crate::error::ValidationError;
use crate::query;
use crate::storage::{self, timestamp};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Maximum number of history entries kept.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Entries shown in the history dialog.
pub const RECENT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub executed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(query: String) -> Self {
        Self {
            query,
            // Stored with microsecond precision.
            executed_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// `[MM/DD HH:MM] query` with newlines flattened and the query cut at 60
    /// characters, as listed in the history dialog.
    pub fn display_line(&self) -> String {
        let flat = self.query.replace('\n', " ");
        let preview = if flat.chars().count() > 60 {
            format!("{}...", flat.chars().take(60).collect::<String>())
        } else {
            flat
        };
        format!("[{}] {}", self.executed_at.format("%m/%d %H:%M"), preview)
    }
}

/// Executed queries, most recent first, without duplicates.
///
/// Every mutation is written through to disk immediately. With no path the
/// store lives in memory only.
#[derive(Debug, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn open(path: Option<PathBuf>) -> Self {
        let entries = path
            .as_deref()
            .map(storage::load_from)
            .unwrap_or_default();
        Self { path, entries }
    }

    /// Record an executed query. The text is normalized first; text with no
    /// actual query is ignored. A repeat moves to the front.
    pub fn add(&mut self, text: &str) {
        let normalized = query::normalize(text);
        if normalized.is_empty() {
            return;
        }
        self.entries.retain(|e| e.query != normalized);
        self.entries.insert(0, HistoryEntry::new(normalized));
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        self.flush();
    }

    pub fn delete_at(&mut self, index: usize) -> Result<HistoryEntry, ValidationError> {
        if index >= self.entries.len() {
            return Err(ValidationError::HistoryIndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.flush();
        Ok(removed)
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.flush();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn recent(&self) -> &[HistoryEntry] {
        &self.entries[..self.entries.len().min(RECENT_LIMIT)]
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) {
        if let Some(path) = &self.path {
            if let Err(e) = storage::save_to(path, &self.entries) {
                warn!(path = %path.display(), error = %e, "Failed to save query history");
            }
        }
    }
}
