use crate::api::{QueryBackend, QueryError, QueryRequest};
use crate::filter::cancel::CancelToken;
use crate::record::LogRecord;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Build a record with `content == message` and fixed host/trace fields.
pub fn record(ts: &str, level: &str, service: &str, message: &str) -> LogRecord {
    LogRecord {
        timestamp: DateTime::parse_from_rfc3339(ts)
            .expect("valid RFC 3339 timestamp")
            .with_timezone(&Utc),
        level: level.to_string(),
        service: service.to_string(),
        message: message.to_string(),
        host: "host-01".to_string(),
        trace_id: "trace-1".to_string(),
        span_id: "span-1".to_string(),
        content: message.to_string(),
    }
}

/// Three records: "payment failed", "login ok", "payment retried".
pub fn scenario_records() -> Vec<LogRecord> {
    vec![
        record("2024-03-15T10:00:00Z", "ERROR", "billing", "payment failed"),
        record("2024-03-15T10:01:00Z", "INFO", "auth", "login ok"),
        record("2024-03-15T10:02:00Z", "WARN", "billing", "payment retried"),
    ]
}

/// In-memory backend: returns canned records (or a canned error), records
/// every request, and can block until released to simulate a slow call.
pub struct MockBackend {
    response: Mutex<Result<Vec<LogRecord>, QueryError>>,
    requests: Mutex<Vec<QueryRequest>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockBackend {
    pub fn returning(records: Vec<LogRecord>) -> Self {
        Self {
            response: Mutex::new(Ok(records)),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn failing(error: QueryError) -> Self {
        let mock = Self::returning(Vec::new());
        *mock.response.lock().unwrap() = Err(error);
        mock
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change what later calls return.
    pub fn set_response(&self, response: Result<Vec<LogRecord>, QueryError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl QueryBackend for MockBackend {
    fn execute(
        &self,
        request: &QueryRequest,
        cancel: &CancelToken,
    ) -> Result<Vec<LogRecord>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }
        self.response.lock().unwrap().clone()
    }
}
