use chrono::{DateTime, Timelike, Utc};

/// Parses an RFC 3339 timestamp (`2024-05-01T10:00:00Z`, with or without
/// fractional seconds or an explicit offset) into UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Calendar day in UTC, `YYYY-MM-DD`.
pub fn format_day(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Hour of day in UTC, 0-23.
pub fn hour_of_day(timestamp: &DateTime<Utc>) -> u32 {
    timestamp.hour()
}

/// Renders seconds as `1h 2m 3s`, `2m 3s` or `3s`, truncating fractions.
pub fn format_duration(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
