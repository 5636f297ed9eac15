//! The fetched record set and the subset currently on display.

use crate::filter::{self, string_filter::StringFilter};
use crate::record::LogRecord;

/// Holds the full baseline set and the current (filtered or queried) set.
///
/// `current` is replaced wholesale on every query run and keeps the order
/// the records arrived in.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    full: Vec<LogRecord>,
    current: Vec<LogRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<LogRecord>) -> Self {
        let mut store = Self::default();
        store.load_full(records);
        store
    }

    /// Replace both sets (startup or reload).
    pub fn load_full(&mut self, records: Vec<LogRecord>) {
        self.current = records.clone();
        self.full = records;
    }

    /// Offline query: empty text shows everything, otherwise keep the
    /// records whose message, service, level or content contain the text.
    pub fn run_offline(&mut self, normalized_query: &str) {
        if normalized_query.is_empty() {
            self.current = self.full.clone();
        } else {
            let f = StringFilter::new(normalized_query);
            self.current = filter::apply(&f, &self.full);
        }
    }

    /// Successful remote query result.
    pub fn replace_current(&mut self, records: Vec<LogRecord>) {
        self.current = records;
    }

    /// Failed remote query: nothing is shown.
    pub fn clear_current(&mut self) {
        self.current.clear();
    }

    /// Explicit "clear" command: back to the full set regardless of query.
    pub fn reset(&mut self) {
        self.current = self.full.clone();
    }

    pub fn full(&self) -> &[LogRecord] {
        &self.full
    }

    pub fn current(&self) -> &[LogRecord] {
        &self.current
    }

    pub fn get(&self, row: usize) -> Option<&LogRecord> {
        self.current.get(row)
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{record, scenario_records};

    #[test]
    fn test_empty_query_restores_full_set() {
        let mut store = RecordStore::new(scenario_records());
        store.run_offline("payment");
        assert_eq!(store.len(), 2);

        store.run_offline("");
        assert_eq!(store.current(), store.full());
    }

    #[test]
    fn test_offline_query_preserves_order() {
        let mut store = RecordStore::new(scenario_records());
        store.run_offline("payment");

        let messages: Vec<&str> = store.current().iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["payment failed", "payment retried"]);
    }

    #[test]
    fn test_offline_query_only_returns_matching_records() {
        let mut records = scenario_records();
        records.push(record("2024-03-15T10:03:00Z", "ERROR", "db", "timeout"));
        let mut store = RecordStore::new(records);

        // Level matches as well as message: "payment failed" is ERROR too
        store.run_offline("ErRoR");
        let services: Vec<&str> = store.current().iter().map(|r| r.service.as_str()).collect();
        assert_eq!(services, vec!["billing", "db"]);

        store.run_offline("DB");
        assert_eq!(store.len(), 1);
        assert_eq!(store.current()[0].message, "timeout");
    }

    #[test]
    fn test_offline_query_without_matches_is_empty() {
        let mut store = RecordStore::new(scenario_records());
        store.run_offline("nothing-like-this");
        assert!(store.is_empty());
        assert_eq!(store.full().len(), 3);
    }

    #[test]
    fn test_reset_ignores_previous_query() {
        let mut store = RecordStore::new(scenario_records());
        store.run_offline("login");
        store.reset();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remote_results_replace_current_only() {
        let mut store = RecordStore::new(scenario_records());
        store.replace_current(vec![record("2024-03-15T10:00:00Z", "INFO", "x", "y")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.full().len(), 3);

        store.clear_current();
        assert!(store.is_empty());
        assert_eq!(store.full().len(), 3);
    }
}
