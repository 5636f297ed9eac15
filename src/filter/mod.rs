pub mod cancel;
pub mod string_filter;

use crate::record::LogRecord;

/// Trait for record-level filtering
pub trait Filter: Send + Sync {
    fn matches(&self, record: &LogRecord) -> bool;
}

/// Keep the records accepted by `filter`, preserving order.
pub fn apply<F: Filter + ?Sized>(filter: &F, records: &[LogRecord]) -> Vec<LogRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}
