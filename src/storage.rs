//! JSON array files backing saved queries and query history.
//!
//! Loading never fails: a missing or malformed file yields an empty list.
//! Saving creates the parent directory and reports I/O errors to the
//! caller, which keeps its in-memory state either way.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

pub const SAVED_QUERIES_FILE: &str = "saved_queries.json";
pub const HISTORY_FILE: &str = "query_history.json";

pub fn load_from<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read data file");
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(items) => items,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse data file");
            Vec::new()
        }
    }
}

pub fn save_to<T: Serialize>(path: &Path, items: &[T]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(items)?;
    fs::write(path, content)
}

/// Serde adapter for stored timestamps: written as RFC 3339, read back
/// from RFC 3339 or a naive ISO 8601 string (taken as UTC).
pub mod timestamp {
    use crate::record::parse_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}
