//! Mapping of raw `query:execute` responses into [`LogRecord`]s.
//!
//! Every field is read with fallbacks: the canonical Grail field first, then
//! a legacy alias, then a default. A record whose timestamp is present but
//! unparseable, or that is not a JSON object, is dropped without failing
//! the query.

use super::QueryError;
use crate::record::{parse_timestamp, LogRecord};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    result: Option<QueryResult>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    records: Vec<Value>,
}

/// Parse a response body and map its records. `now` stands in for records
/// that carry no timestamp at all.
pub fn parse_response(body: &str, now: DateTime<Utc>) -> Result<Vec<LogRecord>, QueryError> {
    let response: ExecuteResponse =
        serde_json::from_str(body).map_err(|e| QueryError::Decode(e.to_string()))?;
    let raw = response.result.map(|r| r.records).unwrap_or_default();
    Ok(map_records(&raw, now))
}

/// Map raw records, dropping the ones that fail to parse.
pub fn map_records(raw: &[Value], now: DateTime<Utc>) -> Vec<LogRecord> {
    let records: Vec<LogRecord> = raw.iter().filter_map(|v| map_record(v, now)).collect();
    let dropped = raw.len() - records.len();
    if dropped > 0 {
        debug!(dropped, "Dropped malformed records from query response");
    }
    records
}

fn map_record(value: &Value, now: DateTime<Utc>) -> Option<LogRecord> {
    let obj = value.as_object()?;

    let timestamp = match obj.get("timestamp") {
        None | Some(Value::Null) => now,
        Some(Value::String(s)) => parse_timestamp(s)?,
        Some(_) => return None,
    };

    let content = first_of(obj, &["content", "message"]).unwrap_or_default();

    Some(LogRecord {
        timestamp,
        level: first_of(obj, &["loglevel"])
            .map(|l| l.to_uppercase())
            .unwrap_or_else(|| "INFO".to_string()),
        service: first_of(obj, &["dt.entity.service", "service_name"])
            .unwrap_or_else(|| "unknown".to_string()),
        message: content.clone(),
        host: first_of(obj, &["dt.entity.host", "host"]).unwrap_or_else(|| "unknown".to_string()),
        trace_id: first_of(obj, &["trace_id"]).unwrap_or_default(),
        span_id: first_of(obj, &["span_id"]).unwrap_or_default(),
        content,
    })
}

/// First present, non-null field among `keys`, rendered as text.
fn first_of(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}
