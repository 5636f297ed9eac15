//! Log records and the column universe used by the table view.
//!
//! A [`LogRecord`] is immutable once built. Columns are a closed enum with an
//! accessor table, so "does this column have text" and "is this column
//! searchable" are static properties rather than string comparisons.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::borrow::Cow;

/// Display/CSV format for timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One log line as returned by the backend (or generated in offline mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub service: String,
    pub message: String,
    pub host: String,
    pub trace_id: String,
    pub span_id: String,
    pub content: String,
}

impl LogRecord {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn severity(&self) -> Severity {
        Severity::from_level(&self.level)
    }
}

/// Coarse severity derived from the free-form level string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Debug,
    Other,
}

impl Severity {
    pub fn from_level(level: &str) -> Self {
        match level {
            "ERROR" => Severity::Error,
            "WARN" => Severity::Warn,
            "INFO" => Severity::Info,
            "DEBUG" => Severity::Debug,
            _ => Severity::Other,
        }
    }
}

type Accessor = for<'a> fn(&'a LogRecord) -> Cow<'a, str>;

/// Every column the table knows about.
///
/// Only the first eight are backed by [`LogRecord`] fields; the rest render
/// as empty cells and never match a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Timestamp,
    Level,
    Service,
    Message,
    Host,
    TraceId,
    SpanId,
    Content,
    UserId,
    SessionId,
    RequestId,
    ResponseTime,
    StatusCode,
    Method,
    Endpoint,
    ClientIp,
    UserAgent,
    Referer,
    ThreadId,
    ProcessId,
    MemoryUsage,
    CpuUsage,
    DiskIo,
    NetworkIo,
    CacheHit,
    DatabaseQuery,
    ErrorCode,
    StackTrace,
    CustomField1,
    CustomField2,
}

impl Column {
    pub const ALL: [Column; 30] = [
        Column::Timestamp,
        Column::Level,
        Column::Service,
        Column::Message,
        Column::Host,
        Column::TraceId,
        Column::SpanId,
        Column::Content,
        Column::UserId,
        Column::SessionId,
        Column::RequestId,
        Column::ResponseTime,
        Column::StatusCode,
        Column::Method,
        Column::Endpoint,
        Column::ClientIp,
        Column::UserAgent,
        Column::Referer,
        Column::ThreadId,
        Column::ProcessId,
        Column::MemoryUsage,
        Column::CpuUsage,
        Column::DiskIo,
        Column::NetworkIo,
        Column::CacheHit,
        Column::DatabaseQuery,
        Column::ErrorCode,
        Column::StackTrace,
        Column::CustomField1,
        Column::CustomField2,
    ];

    /// Columns shown on a fresh start.
    pub const DEFAULT_VISIBLE: [Column; 5] = [
        Column::Timestamp,
        Column::Level,
        Column::Service,
        Column::Message,
        Column::Host,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Column::Timestamp => "Timestamp",
            Column::Level => "Level",
            Column::Service => "Service",
            Column::Message => "Message",
            Column::Host => "Host",
            Column::TraceId => "Trace ID",
            Column::SpanId => "Span ID",
            Column::Content => "Content",
            Column::UserId => "User ID",
            Column::SessionId => "Session ID",
            Column::RequestId => "Request ID",
            Column::ResponseTime => "Response Time",
            Column::StatusCode => "Status Code",
            Column::Method => "Method",
            Column::Endpoint => "Endpoint",
            Column::ClientIp => "Client IP",
            Column::UserAgent => "User Agent",
            Column::Referer => "Referer",
            Column::ThreadId => "Thread ID",
            Column::ProcessId => "Process ID",
            Column::MemoryUsage => "Memory Usage",
            Column::CpuUsage => "CPU Usage",
            Column::DiskIo => "Disk IO",
            Column::NetworkIo => "Network IO",
            Column::CacheHit => "Cache Hit",
            Column::DatabaseQuery => "Database Query",
            Column::ErrorCode => "Error Code",
            Column::StackTrace => "Stack Trace",
            Column::CustomField1 => "Custom Field 1",
            Column::CustomField2 => "Custom Field 2",
        }
    }

    /// Look up a column by its display title (case-insensitive).
    pub fn from_title(title: &str) -> Option<Column> {
        let title = title.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.title().eq_ignore_ascii_case(title))
    }

    fn accessor(self) -> Option<Accessor> {
        let f: Accessor = match self {
            Column::Timestamp => |r| Cow::Owned(r.formatted_timestamp()),
            Column::Level => |r| Cow::Borrowed(r.level.as_str()),
            Column::Service => |r| Cow::Borrowed(r.service.as_str()),
            Column::Message => |r| Cow::Borrowed(r.message.as_str()),
            Column::Host => |r| Cow::Borrowed(r.host.as_str()),
            Column::TraceId => |r| Cow::Borrowed(r.trace_id.as_str()),
            Column::SpanId => |r| Cow::Borrowed(r.span_id.as_str()),
            Column::Content => |r| Cow::Borrowed(r.content.as_str()),
            _ => return None,
        };
        Some(f)
    }

    /// Full, untruncated text of this column for `record`.
    pub fn text(self, record: &LogRecord) -> Cow<'_, str> {
        match self.accessor() {
            Some(f) => f(record),
            None => Cow::Borrowed(""),
        }
    }

    /// Level is rendered as a styled badge and excluded from search, as are
    /// columns without a backing field.
    pub fn is_searchable(self) -> bool {
        self != Column::Level && self.accessor().is_some()
    }

    /// Maximum characters shown in a table cell before appending `...`.
    pub fn display_limit(self) -> Option<usize> {
        match self {
            Column::Message => Some(50),
            Column::Content => Some(30),
            _ => None,
        }
    }

    /// Cell text as displayed in the table (possibly truncated).
    pub fn display_text(self, record: &LogRecord) -> String {
        let text = self.text(record);
        match self.display_limit() {
            Some(limit) => truncate_with_ellipsis(&text, limit),
            None => text.into_owned(),
        }
    }
}

/// Truncate to `limit` characters, appending `...` when anything was cut.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// RFC 3339 with any offset, or a naive ISO 8601 timestamp taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Multi-line description of a record for the details pane.
pub fn format_details(record: &LogRecord) -> String {
    format!(
        "Timestamp: {}\nLevel: {}\nService: {}\nHost: {}\nTrace ID: {}\nSpan ID: {}\n\nMessage:\n{}\n\nContent:\n{}",
        record.formatted_timestamp(),
        record.level,
        record.service,
        record.host,
        record.trace_id,
        record.span_id,
        record.message,
        record.content
    )
}
