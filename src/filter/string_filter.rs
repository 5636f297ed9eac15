use super::Filter;
use crate::record::LogRecord;

/// Case-insensitive substring filter used in offline mode.
///
/// A record matches when the pattern occurs in any of its message, service,
/// level or content fields. No regex, no tokenizing.
pub struct StringFilter {
    pattern: String,
}

impl StringFilter {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_lowercase(),
        }
    }

    fn field_matches(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.pattern)
    }
}

impl Filter for StringFilter {
    fn matches(&self, record: &LogRecord) -> bool {
        [
            record.message.as_str(),
            record.service.as_str(),
            record.level.as_str(),
            record.content.as_str(),
        ]
        .into_iter()
        .any(|field| self.field_matches(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::record;

    #[test]
    fn test_matches_each_searched_field() {
        let r = record("2024-03-15T10:00:00Z", "WARN", "payment-service", "Card declined");
        assert!(StringFilter::new("declined").matches(&r));
        assert!(StringFilter::new("PAYMENT").matches(&r));
        assert!(StringFilter::new("warn").matches(&r));
    }

    #[test]
    fn test_host_and_trace_are_not_searched() {
        let mut r = record("2024-03-15T10:00:00Z", "INFO", "svc", "ok");
        r.host = "prod-server-01".to_string();
        r.trace_id = "abc123".to_string();
        r.content = String::new();
        assert!(!StringFilter::new("prod-server").matches(&r));
        assert!(!StringFilter::new("abc123").matches(&r));
    }

    #[test]
    fn test_matches_content() {
        let mut r = record("2024-03-15T10:00:00Z", "INFO", "svc", "ok");
        r.content = "Connection refused by SMTP".to_string();
        assert!(StringFilter::new("smtp").matches(&r));
    }
}
