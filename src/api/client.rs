use super::mapping;
use super::{QueryBackend, QueryError, QueryRequest, REQUEST_TIMEOUT_MS};
use crate::filter::cancel::CancelToken;
use crate::record::LogRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Client-side wall clock limit; slightly above the server-side budget so
/// the API gets to report its own timeout first.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(35);

const EXECUTE_PATH: &str = "/platform/storage/query/v1/query:execute";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecutePayload<'a> {
    query: &'a str,
    default_timeframe_start: String,
    default_timeframe_end: String,
    max_result_records: usize,
    request_timeout_milliseconds: u64,
}

impl<'a> ExecutePayload<'a> {
    fn from_request(request: &'a QueryRequest) -> Self {
        Self {
            query: &request.query,
            default_timeframe_start: iso(request.start),
            default_timeframe_end: iso(request.end),
            max_result_records: request.max_records,
            request_timeout_milliseconds: REQUEST_TIMEOUT_MS,
        }
    }
}

fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Blocking HTTP client for the Grail query endpoint.
pub struct DynatraceClient {
    http: Client,
    base_url: String,
}

impl DynatraceClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, QueryError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| QueryError::Internal(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| QueryError::Internal(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EXECUTE_PATH)
    }
}

impl QueryBackend for DynatraceClient {
    fn execute(
        &self,
        request: &QueryRequest,
        cancel: &CancelToken,
    ) -> Result<Vec<LogRecord>, QueryError> {
        let payload = ExecutePayload::from_request(request);
        info!(
            range = request.time_range.token(),
            max_records = request.max_records,
            "Executing query"
        );

        let response = self.http.post(self.endpoint()).json(&payload).send()?;

        // The blocking call cannot be interrupted; drop the result instead.
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(QueryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let records = mapping::parse_response(&body, Utc::now())?;
        debug!(count = records.len(), "Query response mapped");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timerange::TimeRange;

    fn request() -> QueryRequest {
        let start = crate::record::parse_timestamp("2024-03-14T00:00:00Z").unwrap();
        let end = crate::record::parse_timestamp("2024-03-14T23:59:59.999999Z").unwrap();
        QueryRequest {
            query: "fetch logs".to_string(),
            time_range: TimeRange::Yesterday,
            start,
            end,
            max_records: 500,
        }
    }

    #[test]
    fn test_payload_shape() {
        let req = request();
        let value = serde_json::to_value(ExecutePayload::from_request(&req)).unwrap();
        assert_eq!(value["query"], "fetch logs");
        assert_eq!(value["defaultTimeframeStart"], "2024-03-14T00:00:00.000000Z");
        assert_eq!(value["defaultTimeframeEnd"], "2024-03-14T23:59:59.999999Z");
        assert_eq!(value["maxResultRecords"], 500);
        assert_eq!(value["requestTimeoutMilliseconds"], 30000);
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = DynatraceClient::new("https://abc.apps.dynatrace.com/", "dt0s16.x").unwrap();
        assert_eq!(client.base_url(), "https://abc.apps.dynatrace.com");
        assert_eq!(
            client.endpoint(),
            "https://abc.apps.dynatrace.com/platform/storage/query/v1/query:execute"
        );
    }
}
