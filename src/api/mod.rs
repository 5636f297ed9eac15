//! Remote query collaborator: request type, backend trait, HTTP client,
//! response mapping and the background orchestrator.

pub mod client;
pub mod error;
pub mod mapping;
pub mod orchestrator;

pub use client::DynatraceClient;
pub use error::QueryError;
pub use orchestrator::{QueryOrchestrator, QueryOutcome};

use crate::filter::cancel::CancelToken;
use crate::record::LogRecord;
use crate::timerange::TimeRange;
use chrono::{DateTime, Utc};

/// Default cap on records returned by one query.
pub const DEFAULT_MAX_RECORDS: usize = 1000;

/// Server-side execution budget sent with every request.
pub const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// A fully resolved query: text plus concrete timeframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    pub time_range: TimeRange,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub max_records: usize,
}

impl QueryRequest {
    /// Resolve `time_range` against the wall clock now.
    pub fn new(query: impl Into<String>, time_range: TimeRange, max_records: usize) -> Self {
        let (start, end) = time_range.resolve();
        Self {
            query: query.into(),
            time_range,
            start,
            end,
            max_records,
        }
    }
}

/// Executes a query and maps the response into records.
///
/// Implementations are called from a worker thread and may block. They
/// should check `cancel` where they can and return
/// [`QueryError::Cancelled`] when it is set.
pub trait QueryBackend: Send + Sync {
    fn execute(
        &self,
        request: &QueryRequest,
        cancel: &CancelToken,
    ) -> Result<Vec<LogRecord>, QueryError>;
}
