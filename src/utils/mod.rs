//! Utility functions and helpers.

use chrono::{DateTime, Utc};

/// Quote one CSV field; embedded quotes are doubled.
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Join fields into one CSV row, quoting every value.
pub fn csv_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Format a countdown as `m:ss`.
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format a timestamp for reports.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_csv_field_doubles_embedded_quotes() {
        assert_eq!(csv_field("plain"), "\"plain\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
    }

    #[test]
    fn test_csv_row() {
        assert_eq!(csv_row(&["a", "b\"c"]), "\"a\",\"b\"\"c\"");
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(59), "0:59");
        assert_eq!(format_countdown(300), "5:00");
        assert_eq!(format_countdown(605), "10:05");
    }

    #[test]
    fn test_format_time() {
        let time = Utc.with_ymd_and_hms(2026, 8, 1, 10, 30, 0).unwrap();
        assert_eq!(format_time(time), "2026-08-01 10:30:00");
    }
}
