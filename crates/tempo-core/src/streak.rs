//! Current and longest streak over the set of active days.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::event::Event;
use crate::timeops;

/// How far back the longest-streak scan looks from the latest activity.
const LONGEST_SCAN_DAYS: i64 = 365;

/// Streak summary for the whole loaded window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreakInfo {
    pub current: u32,
    pub longest: u32,
    pub last_activity: Option<DateTime<Utc>>,
    pub is_active: bool,
}

/// Computes streaks from the local-date set of the events.
///
/// The current streak is anchored at the latest activity date rather than
/// today, so a report generated just after midnight does not zero a streak
/// before the first event of the day.
pub fn compute<Tz: TimeZone>(events: &[Event], tz: &Tz, now: DateTime<Utc>) -> StreakInfo {
    let days = day_set(events, tz);
    let Some(&latest) = days.iter().next_back() else {
        return StreakInfo::default();
    };
    let last_activity = events.iter().map(|e| e.timestamp).max();

    let mut current = 0u32;
    let mut day = latest;
    while days.contains(&day) {
        current += 1;
        day = day - Duration::days(1);
    }

    let mut longest = 0u32;
    let mut run = 0u32;
    for offset in (0..LONGEST_SCAN_DAYS).rev() {
        let day = latest - Duration::days(offset);
        if days.contains(&day) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    let today = timeops::local_date(now, tz);
    let yesterday = today - Duration::days(1);
    let is_active = days.contains(&today) || days.contains(&yesterday);

    StreakInfo {
        current,
        longest,
        last_activity,
        is_active,
    }
}

/// Start and end dates of the longest run, scanning the same window as
/// [`compute`]. Ties keep the earliest run.
pub fn longest_streak_range<Tz: TimeZone>(
    events: &[Event],
    tz: &Tz,
) -> Option<(NaiveDate, NaiveDate)> {
    let days = day_set(events, tz);
    let &latest = days.iter().next_back()?;

    let mut best: Option<(NaiveDate, NaiveDate)> = None;
    let mut best_len = 0u32;
    let mut run_start: Option<NaiveDate> = None;
    let mut run = 0u32;

    for offset in (0..LONGEST_SCAN_DAYS).rev() {
        let day = latest - Duration::days(offset);
        if days.contains(&day) {
            if run == 0 {
                run_start = Some(day);
            }
            run += 1;
            if run > best_len {
                best_len = run;
                best = run_start.map(|start| (start, day));
            }
        } else {
            run = 0;
            run_start = None;
        }
    }

    best
}

/// Distinct local dates carrying at least one event.
pub fn day_set<Tz: TimeZone>(events: &[Event], tz: &Tz) -> BTreeSet<NaiveDate> {
    events
        .iter()
        .map(|e| timeops::local_date(e.timestamp, tz))
        .collect()
}
