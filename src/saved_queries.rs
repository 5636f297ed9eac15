//! Named queries saved from the editor, persisted as JSON.

use crate::error::ValidationError;
use crate::storage::{self, timestamp};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub name: String,
    pub query: String,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl SavedQuery {
    /// `name - <first 30 chars>...` as listed in the load dialog.
    pub fn display_line(&self) -> String {
        let preview: String = self.query.chars().take(30).collect();
        format!("{} - {}...", self.name, preview.replace('\n', " "))
    }
}

/// Named queries, most recently added first. Names are unique
/// (case-sensitive). Mutations are written through immediately.
#[derive(Debug, Default)]
pub struct SavedQueryStore {
    path: Option<PathBuf>,
    queries: Vec<SavedQuery>,
}

impl SavedQueryStore {
    pub fn open(path: Option<PathBuf>) -> Self {
        let queries = path
            .as_deref()
            .map(storage::load_from)
            .unwrap_or_default();
        Self { path, queries }
    }

    pub fn list(&self) -> &[SavedQuery] {
        &self.queries
    }

    pub fn add(&mut self, name: &str, query: &str) -> Result<(), ValidationError> {
        if query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if self.get(name).is_some() {
            return Err(ValidationError::DuplicateQueryName(name.to_string()));
        }
        self.queries.insert(
            0,
            SavedQuery {
                name: name.to_string(),
                query: query.to_string(),
                created_at: Utc::now().trunc_subsecs(6),
            },
        );
        self.flush();
        Ok(())
    }

    /// Remove by name; absent names are ignored.
    pub fn delete(&mut self, name: &str) {
        self.queries.retain(|q| q.name != name);
        self.flush();
    }

    pub fn get(&self, name: &str) -> Option<&SavedQuery> {
        self.queries.iter().find(|q| q.name == name)
    }

    /// Replace the text of an existing query. Returns false when absent.
    pub fn update(&mut self, name: &str, query: &str) -> bool {
        let Some(saved) = self.queries.iter_mut().find(|q| q.name == name) else {
            return false;
        };
        saved.query = query.to_string();
        self.flush();
        true
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    fn flush(&self) {
        if let Some(path) = &self.path {
            if let Err(e) = storage::save_to(path, &self.queries) {
                warn!(path = %path.display(), error = %e, "Failed to save queries");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_prepends() {
        let mut store = SavedQueryStore::default();
        store.add("errors", "fetch logs | filter loglevel == \"ERROR\"").unwrap();
        store.add("all", "fetch logs").unwrap();
        let names: Vec<&str> = store.list().iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, vec!["all", "errors"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut store = SavedQueryStore::default();
        store.add("errors", "a").unwrap();
        assert_eq!(
            store.add("errors", "b"),
            Err(ValidationError::DuplicateQueryName("errors".into()))
        );
        assert_eq!(store.get("errors").unwrap().query, "a");
        // Case-sensitive key
        assert!(store.add("Errors", "b").is_ok());
    }

    #[test]
    fn test_blank_query_rejected() {
        let mut store = SavedQueryStore::default();
        assert_eq!(store.add("empty", "  \n"), Err(ValidationError::EmptyQuery));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = SavedQueryStore::default();
        store.add("a", "x").unwrap();
        store.delete("a");
        store.delete("a");
        store.delete("missing");
        assert!(store.is_empty());
    }

    #[test]
    fn test_update() {
        let mut store = SavedQueryStore::default();
        store.add("a", "x").unwrap();
        assert!(store.update("a", "y"));
        assert!(!store.update("b", "y"));
        assert_eq!(store.get("a").unwrap().query, "y");
    }

    #[test]
    fn test_display_line() {
        let q = SavedQuery {
            name: "errs".into(),
            query: "fetch logs\n| filter loglevel == \"ERROR\"".into(),
            created_at: Utc::now(),
        };
        assert_eq!(q.display_line(), "errs - fetch logs | filter loglevel =...");
    }

    #[test]
    fn test_persisted_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(storage::SAVED_QUERIES_FILE);

        let mut store = SavedQueryStore::open(Some(path.clone()));
        store.add("a", "x").unwrap();
        store.add("b", "y").unwrap();

        let reopened = SavedQueryStore::open(Some(path));
        assert_eq!(reopened.list(), store.list());
    }

    #[test]
    fn test_malformed_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(storage::SAVED_QUERIES_FILE);
        std::fs::write(&path, "[{\"name\": 3}]").unwrap();
        assert!(SavedQueryStore::open(Some(path)).is_empty());
    }
}
