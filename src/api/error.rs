use thiserror::Error;

/// Failure of a remote query. Always recovered at the event loop: the
/// current record set is emptied and the message becomes a notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Request timeout - query took too long to execute")]
    Timeout,

    #[error("Connection error - unable to reach Dynatrace API: {0}")]
    Connection(String),

    #[error("API Error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode API response: {0}")]
    Decode(String),

    #[error("Query cancelled")]
    Cancelled,

    #[error("Unexpected error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Transport-level failure, as opposed to a response the API rejected.
    pub fn is_network(&self) -> bool {
        matches!(self, QueryError::Timeout | QueryError::Connection(_))
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            QueryError::Timeout
        } else if e.is_connect() || e.is_request() {
            QueryError::Connection(e.to_string())
        } else if e.is_decode() || e.is_body() {
            QueryError::Decode(e.to_string())
        } else {
            QueryError::Internal(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_classification() {
        assert!(QueryError::Timeout.is_network());
        assert!(QueryError::Connection("refused".into()).is_network());
        assert!(!QueryError::Api {
            status: 401,
            body: "unauthorized".into()
        }
        .is_network());
        assert!(!QueryError::Decode("eof".into()).is_network());
    }

    #[test]
    fn test_api_error_message_carries_status() {
        let e = QueryError::Api {
            status: 400,
            body: "bad query".into(),
        };
        assert_eq!(e.to_string(), "API Error 400: bad query");
    }
}
