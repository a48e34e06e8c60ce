//! Timezone-aware day, week and month boundaries.
//!
//! Weeks start on Monday. All functions take the active timezone explicitly
//! and return UTC instants, so window arithmetic stays comparable with event
//! timestamps.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone, Utc};

/// Resolves a local calendar date's midnight to a UTC instant.
///
/// DST fall-back picks the earlier time; a midnight erased by spring-forward
/// falls back to 01:00 local.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap();
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            let one_am = date.and_hms_opt(1, 0, 0).unwrap();
            match tz.from_local_datetime(&one_am) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    dt.with_timezone(&Utc)
                }
                LocalResult::None => midnight.and_utc(),
            }
        }
    }
}

/// Midnight of the local date containing `t`.
pub fn start_of_day<Tz: TimeZone>(t: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    local_midnight(local_date(t, tz), tz)
}

/// Midnight of the Monday of the local week containing `t`.
pub fn start_of_week<Tz: TimeZone>(t: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let date = local_date(t, tz);
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    local_midnight(monday, tz)
}

/// Midnight of the first day of the local month containing `t`.
pub fn start_of_month<Tz: TimeZone>(t: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let date = local_date(t, tz);
    let first = date.with_day(1).unwrap_or(date);
    local_midnight(first, tz)
}

/// Local calendar date of `t` in `tz`.
pub fn local_date<Tz: TimeZone>(t: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    t.with_timezone(tz).date_naive()
}

/// Local `YYYY-MM-DD` string for `t`.
pub fn date_string<Tz: TimeZone>(t: DateTime<Utc>, tz: &Tz) -> String {
    local_date(t, tz).format("%Y-%m-%d").to_string()
}

/// Parses a `YYYY-MM-DD` string into that date's local midnight.
pub fn date_from<Tz: TimeZone>(date_str: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
    Some(local_midnight(date, tz))
}

/// English weekday name for a `YYYY-MM-DD` string, or `"Unknown"`.
pub fn weekday_name(date_str: &str) -> String {
    match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        Ok(date) => date.format("%A").to_string(),
        Err(_) => "Unknown".to_string(),
    }
}
