//! Date/time utilities.
//!
//! Timestamps are stored in the database as UTC text (`YYYY-MM-DD HH:MM:SS`)
//! so they compare and sort lexicographically. Calendar dates shown to
//! readers and used in post URLs are taken in the configured timezone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Storage format for timestamps.
pub const DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a UTC datetime for storage.
pub fn to_db_string(dt: &DateTime<Utc>) -> String {
    dt.format(DB_FORMAT).to_string()
}

/// The current time in storage format.
pub fn now_db_string() -> String {
    to_db_string(&Utc::now())
}

/// Parse a stored timestamp (storage format or RFC3339).
pub fn parse_db_datetime(datetime_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(datetime_str, DB_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(datetime_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a timezone name, falling back to UTC.
pub fn parse_timezone(timezone: &str) -> Tz {
    timezone.parse().unwrap_or(Tz::UTC)
}

/// Format a stored timestamp in the given timezone.
///
/// Returns the original string if it cannot be parsed.
pub fn format_datetime(datetime_str: &str, timezone: &str, format: &str) -> String {
    match parse_db_datetime(datetime_str) {
        Some(dt) => dt
            .with_timezone(&parse_timezone(timezone))
            .format(format)
            .to_string(),
        None => datetime_str.to_string(),
    }
}

/// Format a stored timestamp the way pages show publish dates.
pub fn format_datetime_default(datetime_str: &str, timezone: &str) -> String {
    format_datetime(datetime_str, timezone, "%b %-d, %Y, %H:%M")
}

/// Calendar date `(year, month, day)` of a stored timestamp in the given timezone.
pub fn local_date(datetime_str: &str, timezone: &str) -> Option<(i32, u32, u32)> {
    let local = parse_db_datetime(datetime_str)?.with_timezone(&parse_timezone(timezone));
    Some((local.year(), local.month(), local.day()))
}

/// UTC storage bounds `[start, end)` covering one local calendar day.
///
/// Returns `None` for impossible dates (e.g. month 13, Feb 30).
pub fn day_bounds(year: i32, month: u32, day: u32, timezone: &str) -> Option<(String, String)> {
    let tz = parse_timezone(timezone);
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let next = date.succ_opt()?;

    let start = local_midnight(&tz, date)?;
    let end = local_midnight(&tz, next)?;

    Some((to_db_string(&start), to_db_string(&end)))
}

/// First instant of a local day, skipping a DST gap at midnight if there is one.
fn local_midnight(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_string_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let s = to_db_string(&dt);
        assert_eq!(s, "2024-01-15 10:30:00");
        assert_eq!(parse_db_datetime(&s), Some(dt));
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_db_datetime("2024-01-15T10:30:00+09:00").unwrap();
        assert_eq!(to_db_string(&dt), "2024-01-15 01:30:00");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_db_datetime("yesterday").is_none());
    }

    #[test]
    fn test_format_datetime_timezone() {
        let result = format_datetime("2024-01-15 10:30:00", "Asia/Tokyo", "%Y/%m/%d %H:%M");
        assert_eq!(result, "2024/01/15 19:30");
    }

    #[test]
    fn test_format_datetime_unparseable() {
        assert_eq!(format_datetime("bogus", "UTC", "%Y"), "bogus");
    }

    #[test]
    fn test_format_datetime_default() {
        let result = format_datetime_default("2024-03-05 08:04:00", "UTC");
        assert_eq!(result, "Mar 5, 2024, 08:04");
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 23:30 UTC on the 15th is already the 16th in Tokyo
        assert_eq!(
            local_date("2024-01-15 23:30:00", "Asia/Tokyo"),
            Some((2024, 1, 16))
        );
        assert_eq!(local_date("2024-01-15 23:30:00", "UTC"), Some((2024, 1, 15)));
    }

    #[test]
    fn test_day_bounds_utc() {
        let (start, end) = day_bounds(2024, 2, 29, "UTC").unwrap();
        assert_eq!(start, "2024-02-29 00:00:00");
        assert_eq!(end, "2024-03-01 00:00:00");
    }

    #[test]
    fn test_day_bounds_offset_zone() {
        let (start, end) = day_bounds(2024, 1, 16, "Asia/Tokyo").unwrap();
        assert_eq!(start, "2024-01-15 15:00:00");
        assert_eq!(end, "2024-01-16 15:00:00");
    }

    #[test]
    fn test_day_bounds_invalid_date() {
        assert!(day_bounds(2023, 2, 29, "UTC").is_none());
        assert!(day_bounds(2024, 13, 1, "UTC").is_none());
        assert!(day_bounds(2024, 1, 0, "UTC").is_none());
    }

    #[test]
    fn test_parse_timezone_fallback() {
        assert_eq!(parse_timezone("Nowhere/Special"), Tz::UTC);
        assert_eq!(parse_timezone("Europe/Madrid"), Tz::Europe__Madrid);
    }
}
