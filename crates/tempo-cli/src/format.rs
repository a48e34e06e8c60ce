//! Human-readable formatting helpers for the pretty printers.

/// Formats a duration in seconds as "42s", "12m", "3h" or "3h 20m".
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.0 {
        return "0s".to_string();
    }
    if seconds < 60.0 {
        return format!("{}s", seconds as i64);
    }
    let minutes = (seconds as i64) / 60;
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{hours}h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_below_a_minute() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(59.9), "59s");
    }

    #[test]
    fn minutes_below_an_hour() {
        assert_eq!(format_duration(60.0), "1m");
        assert_eq!(format_duration(2_700.0), "45m");
        assert_eq!(format_duration(2_754.0), "45m");
    }

    #[test]
    fn hours_with_and_without_minutes() {
        assert_eq!(format_duration(3_600.0), "1h");
        assert_eq!(format_duration(9_000.0), "2h 30m");
    }

    #[test]
    fn negative_is_zero() {
        assert_eq!(format_duration(-5.0), "0s");
    }
}
