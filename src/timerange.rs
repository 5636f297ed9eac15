//! Symbolic time ranges and their resolution to concrete UTC instants.

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// One of the fixed time-range choices offered next to the query editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    Last30Minutes,
    Last60Minutes,
    Last2Hours,
    Last6Hours,
    Today,
    Yesterday,
    Last24Hours,
    Last7Days,
}

impl TimeRange {
    pub const ALL: [TimeRange; 8] = [
        TimeRange::Last30Minutes,
        TimeRange::Last60Minutes,
        TimeRange::Last2Hours,
        TimeRange::Last6Hours,
        TimeRange::Today,
        TimeRange::Yesterday,
        TimeRange::Last24Hours,
        TimeRange::Last7Days,
    ];

    pub fn token(self) -> &'static str {
        match self {
            TimeRange::Last30Minutes => "30m",
            TimeRange::Last60Minutes => "60m",
            TimeRange::Last2Hours => "2h",
            TimeRange::Last6Hours => "6h",
            TimeRange::Today => "today",
            TimeRange::Yesterday => "yesterday",
            TimeRange::Last24Hours => "24h",
            TimeRange::Last7Days => "7d",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Last30Minutes => "Last 30 minutes",
            TimeRange::Last60Minutes => "Last 60 minutes",
            TimeRange::Last2Hours => "Last 2 hours",
            TimeRange::Last6Hours => "Last 6 hours",
            TimeRange::Today => "Today",
            TimeRange::Yesterday => "Yesterday",
            TimeRange::Last24Hours => "Last 24 hours",
            TimeRange::Last7Days => "Last 7 days",
        }
    }

    /// Parse a token such as `2h` or `yesterday`.
    ///
    /// Matching is exact after trimming whitespace, so `30M` is unknown.
    /// Unknown tokens fall back to the 30 minute default instead of failing;
    /// a stale token in a config file should never block startup.
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        TimeRange::ALL
            .iter()
            .copied()
            .find(|r| r.token() == token)
            .unwrap_or_default()
    }

    /// Whether `token` names a known range (used for config validation).
    pub fn is_known_token(token: &str) -> bool {
        let token = token.trim();
        TimeRange::ALL
            .iter()
            .any(|r| r.token() == token)
    }

    /// Next choice in the list, wrapping around.
    pub fn cycle(self) -> Self {
        let idx = TimeRange::ALL.iter().position(|r| *r == self).unwrap_or(0);
        TimeRange::ALL[(idx + 1) % TimeRange::ALL.len()]
    }

    /// Resolve against the current wall clock.
    pub fn resolve(self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.resolve_at(Utc::now())
    }

    /// Resolve against an explicit `now`.
    ///
    /// Relative ranges end at `now`. `Today` starts at UTC midnight.
    /// `Yesterday` covers the whole previous calendar day, not a rolling
    /// 24 hours.
    pub fn resolve_at(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let relative = |d: Duration| (now - d, now);
        match self {
            TimeRange::Last30Minutes => relative(Duration::minutes(30)),
            TimeRange::Last60Minutes => relative(Duration::minutes(60)),
            TimeRange::Last2Hours => relative(Duration::hours(2)),
            TimeRange::Last6Hours => relative(Duration::hours(6)),
            TimeRange::Last24Hours => relative(Duration::hours(24)),
            TimeRange::Last7Days => relative(Duration::days(7)),
            TimeRange::Today => (start_of_day(now), now),
            TimeRange::Yesterday => {
                let day = now - Duration::days(1);
                (start_of_day(day), end_of_day(day))
            }
        }
    }
}

fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
    at.date_naive().and_time(last).and_utc()
}

/// Resolve a raw token in one step.
pub fn calculate_timeframe(token: &str, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    TimeRange::from_token(token).resolve_at(now)
}
