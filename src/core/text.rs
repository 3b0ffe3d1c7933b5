//! Duration and text utilities
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Parse a time duration string like "30m", "2h", "1d", "1h30m" into seconds
///
/// Returns None when the total does not fit in an i64.
pub fn parse_duration(time_str: &str) -> Option<i64> {
    let time_str = time_str.trim().to_lowercase();
    let mut total_seconds: i64 = 0;
    let mut current_number = String::new();

    for c in time_str.chars() {
        if c.is_ascii_digit() {
            current_number.push(c);
        } else if !current_number.is_empty() {
            let value: i64 = current_number.parse().ok()?;
            current_number.clear();

            let unit: i64 = match c {
                's' => 1,
                'm' => 60,
                'h' => 60 * 60,
                'd' => 60 * 60 * 24,
                'w' => 60 * 60 * 24 * 7,
                _ => return None,
            };
            total_seconds = value
                .checked_mul(unit)
                .and_then(|seconds| total_seconds.checked_add(seconds))?;
        } else {
            return None;
        }
    }

    // A trailing bare number ("15") has no unit
    if !current_number.is_empty() {
        return None;
    }

    if total_seconds > 0 {
        Some(total_seconds)
    } else {
        None
    }
}

/// Format a duration in seconds into a human-readable string
pub fn format_duration(seconds: i64) -> String {
    let plural = |n: i64| if n == 1 { "" } else { "s" };

    if seconds < 60 {
        format!("{} second{}", seconds, plural(seconds))
    } else if seconds < 3600 {
        let mins = seconds / 60;
        format!("{} minute{}", mins, plural(mins))
    } else if seconds < 86400 {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        if mins > 0 {
            format!("{} hour{} {} minute{}", hours, plural(hours), mins, plural(mins))
        } else {
            format!("{} hour{}", hours, plural(hours))
        }
    } else {
        let days = seconds / 86400;
        let hours = (seconds % 86400) / 3600;
        if hours > 0 {
            format!("{} day{} {} hour{}", days, plural(days), hours, plural(hours))
        } else {
            format!("{} day{}", days, plural(days))
        }
    }
}

/// Truncate to at most `max_chars` characters, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Resolve a local wall-clock date and time to epoch milliseconds
///
/// Returns None for times that do not exist locally (DST gaps).
pub fn local_millis(date: NaiveDate, time: NaiveTime) -> Option<i64> {
    Local
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// Parse a reminder time: either a relative duration ("30m", "1h30m") counted
/// from `now_millis`, or a local date-time ("2026-10-18T09:30" / "2026-10-18 09:30").
pub fn parse_due(input: &str, now_millis: i64) -> Option<i64> {
    let input = input.trim();
    if let Some(seconds) = parse_duration(input) {
        return seconds
            .checked_mul(1000)
            .and_then(|millis| now_millis.checked_add(millis));
    }

    ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .and_then(|naive| local_millis(naive.date(), naive.time()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Some(30));
        assert_eq!(parse_duration("30m"), Some(1800));
        assert_eq!(parse_duration("2h"), Some(7200));
        assert_eq!(parse_duration("1d"), Some(86400));
        assert_eq!(parse_duration("1w"), Some(604800));
        assert_eq!(parse_duration("1h30m"), Some(5400));
        assert_eq!(parse_duration("invalid"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("15"), None);
    }

    #[test]
    fn test_huge_durations_are_rejected() {
        assert_eq!(parse_duration("999999999999999w"), None);
        assert_eq!(parse_duration("99999999999999999999s"), None);
        assert_eq!(parse_duration("9223372036854775807s1s"), None);
        assert_eq!(parse_due("10000000000000d", 1_900_000_000_000), None);
        assert_eq!(parse_due("9223372036854775s", 1_900_000_000_000), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30 seconds");
        assert_eq!(format_duration(1), "1 second");
        assert_eq!(format_duration(60), "1 minute");
        assert_eq!(format_duration(120), "2 minutes");
        assert_eq!(format_duration(3600), "1 hour");
        assert_eq!(format_duration(3660), "1 hour 1 minute");
        assert_eq!(format_duration(86400), "1 day");
        assert_eq!(format_duration(90000), "1 day 1 hour");
    }

    #[test]
    fn test_truncate_chars_respects_utf8() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("añoñeño", 3), "año");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_parse_due_relative() {
        assert_eq!(parse_due("30m", 1_000), Some(1_000 + 1_800_000));
        assert_eq!(parse_due(" 1h ", 0), Some(3_600_000));
    }

    #[test]
    fn test_parse_due_absolute_matches_local_time() {
        let date = NaiveDate::from_ymd_opt(2030, 3, 14).unwrap();
        let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        let expected = local_millis(date, time);

        assert!(expected.is_some());
        assert_eq!(parse_due("2030-03-14T09:30", 0), expected);
        assert_eq!(parse_due("2030-03-14 09:30", 0), expected);
        assert_eq!(parse_due("14/03/2030", 0), None);
    }
}
