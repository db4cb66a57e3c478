//! String formatting utilities for UI rendering.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Sanitize a string for single-line output (replace newlines with spaces).
pub fn single_line(s: &str) -> String {
    s.replace('\n', " ").replace('\r', "")
}

/// Format a timestamp for display.
///
/// Pretty output is shown in `tz` when one is configured; plain output is
/// always RFC 3339 UTC.
pub fn format_datetime(dt: &DateTime<Utc>, tz: Option<Tz>, pretty: bool) -> String {
    if !pretty {
        return dt.to_rfc3339();
    }
    match tz {
        Some(tz) => dt.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string(),
        None => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Odometer reading with thousands separators in pretty mode.
pub fn format_km(km: u32, pretty: bool) -> String {
    if !pretty {
        return km.to_string();
    }
    let digits = km.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{} km", out)
}

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Format bytes as human-readable size.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("hello\nworld"), "hello world");
        assert_eq!(single_line("no newlines"), "no newlines");
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 15, 30, 0).unwrap();
        assert_eq!(format_datetime(&dt, None, true), "2024-06-01 15:30 UTC");
        assert_eq!(format_datetime(&dt, None, false), "2024-06-01T15:30:00+00:00");
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        assert_eq!(format_datetime(&dt, Some(tz), true), "2024-06-01 12:30 -03");
    }

    #[test]
    fn test_format_km() {
        assert_eq!(format_km(85_000, false), "85000");
        assert_eq!(format_km(85_000, true), "85,000 km");
        assert_eq!(format_km(1_234_567, true), "1,234,567 km");
        assert_eq!(format_km(999, true), "999 km");
        assert_eq!(format_km(0, true), "0 km");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(350.0), "350.00");
        assert_eq!(format_money(12.5), "12.50");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
