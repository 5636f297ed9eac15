//! Sample records for offline (development) mode.

use crate::record::LogRecord;
use chrono::{DateTime, Duration, Utc};

/// Number of generated records appended after the hand-written samples.
pub const GENERATED_COUNT: usize = 200;

const SERVICES: [&str; 11] = [
    "payment-service",
    "user-service",
    "inventory-service",
    "database-service",
    "api-gateway",
    "cache-service",
    "notification-service",
    "order-service",
    "auth-service",
    "analytics-service",
    "recommendation-service",
];

const LEVELS: [&str; 4] = ["ERROR", "WARN", "INFO", "DEBUG"];

const HOSTS: [&str; 8] = [
    "prod-server-01",
    "prod-server-02",
    "prod-server-03",
    "db-server-01",
    "gateway-01",
    "cache-server-01",
    "notification-01",
    "order-server-01",
];

// (minutes ago, level, service, message, trace, span, host, content)
type Sample = (
    i64,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const SAMPLES: [Sample; 8] = [
    (
        1,
        "ERROR",
        "payment-service",
        "Failed to process payment for order #12345",
        "abc123def456",
        "789xyz",
        "prod-server-01",
        "Payment processing failed due to insufficient funds",
    ),
    (
        2,
        "INFO",
        "user-service",
        "User authentication successful",
        "def456ghi789",
        "123abc",
        "prod-server-02",
        "User john.doe@example.com logged in successfully",
    ),
    (
        3,
        "WARN",
        "inventory-service",
        "Low stock alert for product SKU-001",
        "ghi789jkl012",
        "456def",
        "prod-server-03",
        "Product SKU-001 has only 5 items remaining in inventory",
    ),
    (
        5,
        "ERROR",
        "database-service",
        "Database connection timeout",
        "jkl012mno345",
        "789ghi",
        "db-server-01",
        "Connection to primary database timed out after 30 seconds",
    ),
    (
        7,
        "INFO",
        "api-gateway",
        "Health check passed",
        "mno345pqr678",
        "012jkl",
        "gateway-01",
        "All services responding normally",
    ),
    (
        10,
        "DEBUG",
        "cache-service",
        "Cache miss for key user:12345",
        "pqr678stu901",
        "345mno",
        "cache-server-01",
        "Key user:12345 not found in Redis cache, fetching from database",
    ),
    (
        12,
        "ERROR",
        "notification-service",
        "Failed to send email notification",
        "stu901vwx234",
        "678pqr",
        "notification-01",
        "SMTP server connection failed: Connection refused",
    ),
    (
        15,
        "INFO",
        "order-service",
        "New order created successfully",
        "vwx234yza567",
        "901stu",
        "order-server-01",
        "Order #12346 created for customer ID 7890",
    ),
];

/// The hand-written samples followed by `generated` synthetic records,
/// timestamped relative to `now`.
///
/// Generation is a fixed permutation rather than random so offline runs
/// and tests see the same data.
pub fn sample_records(now: DateTime<Utc>, generated: usize) -> Vec<LogRecord> {
    let mut records: Vec<LogRecord> = SAMPLES
        .iter()
        .map(
            |&(ago, level, service, message, trace_id, span_id, host, content)| LogRecord {
                timestamp: now - Duration::minutes(ago),
                level: level.to_string(),
                service: service.to_string(),
                message: message.to_string(),
                host: host.to_string(),
                trace_id: trace_id.to_string(),
                span_id: span_id.to_string(),
                content: content.to_string(),
            },
        )
        .collect();

    records.extend((0..generated).map(|i| generated_record(now, i)));
    records
}

fn generated_record(now: DateTime<Utc>, i: usize) -> LogRecord {
    let n = i + 1;
    // Spread across the last day; primes keep the fields from lining up.
    let ago = 1 + (i * 7919) % 1440;
    let origin = SERVICES[(i * 5 + 3) % SERVICES.len()];
    LogRecord {
        timestamp: now - Duration::minutes(ago as i64),
        level: LEVELS[(i * 3 + i / 4) % LEVELS.len()].to_string(),
        service: SERVICES[(i * 7) % SERVICES.len()].to_string(),
        message: format!("Log message #{} from {}", n, origin),
        host: HOSTS[(i * 11) % HOSTS.len()].to_string(),
        trace_id: format!("trace_{}", 100_000 + (i * 104_729) % 900_000),
        span_id: format!("span_{}", 100 + (i * 613) % 900),
        content: format!(
            "Detailed log content for message #{} with additional context",
            n
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_samples_come_first() {
        let records = sample_records(now(), 10);
        assert_eq!(records.len(), 18);
        assert_eq!(records[0].service, "payment-service");
        assert_eq!(records[0].formatted_timestamp(), "2024-03-15 09:59:00");
        assert_eq!(records[8].message, "Log message #1 from database-service");
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(sample_records(now(), 50), sample_records(now(), 50));
    }

    #[test]
    fn test_generated_records_stay_within_a_day() {
        let records = sample_records(now(), GENERATED_COUNT);
        let oldest = now() - Duration::minutes(1440);
        assert!(records.iter().all(|r| r.timestamp >= oldest && r.timestamp < now()));
    }

    #[test]
    fn test_offline_filter_over_samples() {
        let mut store = RecordStore::new(sample_records(now(), 0));
        store.run_offline("connection");
        let services: Vec<&str> = store.current().iter().map(|r| r.service.as_str()).collect();
        assert_eq!(services, vec!["database-service", "notification-service"]);
    }
}
