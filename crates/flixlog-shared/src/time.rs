//! Clock and display helpers shared by the store and the CLI.

use chrono::{Local, TimeZone, Utc};

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a playback position as `mm:ss`.
///
/// Minutes are not wrapped into hours, so 3725 seconds reads `62:05`.
/// Non-finite input yields `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "00:00".to_string();
    }
    let secs = (seconds % 60.0).floor() as i64;
    let mins = (seconds / 60.0).floor() as i64;
    format!("{mins:02}:{secs:02}")
}

/// Format an epoch-millisecond timestamp as a readable local date and time.
pub fn format_date(epoch_millis: i64) -> String {
    match Local.timestamp_millis_opt(epoch_millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch_millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.4), "01:05");
        assert_eq!(format_time(3725.0), "62:05");
    }

    #[test]
    fn non_finite_time_is_zero() {
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn date_has_readable_shape() {
        let s = format_date(1_700_000_000_000);
        assert_eq!(s.len(), "2023-11-14 22:13:20".len());
        assert!(s.starts_with("2023-11-1"));
    }

    #[test]
    fn clock_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
