//! Errors raised by user actions.
//!
//! These are always recovered locally: the action becomes a no-op and the
//! message is shown as a transient notification.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least one column must be selected")]
    EmptyColumnSelection,

    #[error("Please enter a query name")]
    EmptyQueryName,

    #[error("Please enter a query to save")]
    EmptyQuery,

    #[error("Query '{0}' already exists")]
    DuplicateQueryName(String),

    #[error("Failed to delete query: history entry {index} does not exist ({len} entries)")]
    HistoryIndexOutOfRange { index: usize, len: usize },

    #[error("No active search")]
    NoActiveSearch,

    #[error("Nothing selected")]
    NothingSelected,
}
