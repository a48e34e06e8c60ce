//! Monday-aligned activity heatmap with a smart start.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::report::DailyStat;
use crate::timeops;

/// Default grid span in weeks, current week included.
pub const HEATMAP_WEEKS: usize = 12;

/// One cell of the heatmap grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapDay {
    pub date: String,
    /// 0 to 4 from the day's share of the window maximum; -1 marks a future day.
    pub level: i8,
    pub lines: i64,
    pub time: f64,
}

/// Builds the grid from per-day totals.
///
/// The grid always ends on the Sunday of the current week. It starts on the
/// later of the Monday `weeks - 1` weeks back and the Monday of the week
/// containing the earliest recorded activity, so a young dataset is not
/// padded with months of empty cells.
pub fn build<Tz: TimeZone>(
    daily: &BTreeMap<String, DailyStat>,
    weeks: usize,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Vec<HeatmapDay> {
    let today = timeops::local_date(now, tz);
    let current_monday = monday_of(today);
    let weeks = weeks.max(1);
    let default_start = current_monday - Duration::days(((weeks - 1) * 7) as i64);

    let earliest_monday = daily
        .keys()
        .filter_map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
        .min()
        .map(monday_of);
    let start = match earliest_monday {
        Some(earliest) => default_start.max(earliest),
        None => default_start,
    };
    let end = current_monday + Duration::days(6);

    let max_time = daily
        .iter()
        .filter_map(|(date, stat)| {
            let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            (parsed >= start && parsed <= end).then_some(stat.time)
        })
        .fold(0.0_f64, f64::max);

    let mut grid = Vec::new();
    let mut day = start;
    while day <= end {
        let date = day.format("%Y-%m-%d").to_string();
        let (time, lines) = daily
            .get(&date)
            .map(|stat| (stat.time, stat.lines))
            .unwrap_or((0.0, 0));

        let level = if day > today {
            -1
        } else {
            activity_level(time, max_time)
        };

        grid.push(HeatmapDay {
            date,
            level,
            lines,
            time,
        });
        day = day + Duration::days(1);
    }

    grid
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

fn activity_level(time: f64, max_time: f64) -> i8 {
    if max_time <= 0.0 || time <= 0.0 {
        return 0;
    }
    let ratio = time / max_time;
    if ratio > 0.75 {
        4
    } else if ratio > 0.5 {
        3
    } else if ratio > 0.25 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn stat(date: &str, time: f64, lines: i64) -> (String, DailyStat) {
        (
            date.to_string(),
            DailyStat {
                date: date.to_string(),
                time,
                lines,
                files: 1,
                session_count: 1,
            },
        )
    }

    fn daily(entries: &[(&str, f64, i64)]) -> BTreeMap<String, DailyStat> {
        entries.iter().map(|(d, t, l)| stat(d, *t, *l)).collect()
    }

    fn now() -> DateTime<Utc> {
        // Monday 2025-02-03.
        "2025-02-03T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn grid_starts_on_monday_and_is_contiguous() {
        let daily = daily(&[("2025-01-20", 3_600.0, 100)]);
        let grid = build(&daily, HEATMAP_WEEKS, &Utc, now());

        let first = NaiveDate::parse_from_str(&grid[0].date, "%Y-%m-%d").unwrap();
        assert_eq!(first.weekday(), Weekday::Mon);
        for pair in grid.windows(2) {
            let a = NaiveDate::parse_from_str(&pair[0].date, "%Y-%m-%d").unwrap();
            let b = NaiveDate::parse_from_str(&pair[1].date, "%Y-%m-%d").unwrap();
            assert_eq!(b - a, Duration::days(1));
        }
    }

    #[test]
    fn smart_start_pulls_in_to_first_activity_week() {
        // One event two weeks before "now": the grid starts on that week's
        // Monday, not twelve weeks back.
        let daily = daily(&[("2025-01-20", 3_600.0, 100)]);
        let grid = build(&daily, HEATMAP_WEEKS, &Utc, now());

        assert_eq!(grid[0].date, "2025-01-20");
        // Three Monday-aligned weeks: Jan 20, Jan 27, Feb 3.
        assert_eq!(grid.len(), 21);
        assert!(grid.len() >= 14 && grid.len() <= 28);
        assert_eq!(grid.last().unwrap().date, "2025-02-09");
    }

    #[test]
    fn old_data_keeps_full_window() {
        let daily = daily(&[("2024-06-01", 3_600.0, 100), ("2025-02-01", 1_800.0, 50)]);
        let grid = build(&daily, HEATMAP_WEEKS, &Utc, now());
        assert_eq!(grid.len(), HEATMAP_WEEKS * 7);
        assert_eq!(grid[0].date, "2024-11-18");
    }

    #[test]
    fn levels_follow_time_ratio() {
        let daily = daily(&[
            ("2025-01-27", 4_000.0, 10),
            ("2025-01-28", 2_400.0, 10),
            ("2025-01-29", 1_600.0, 10),
            ("2025-01-30", 600.0, 10),
            ("2025-01-31", 0.0, 0),
        ]);
        let grid = build(&daily, HEATMAP_WEEKS, &Utc, now());
        let level_of = |date: &str| grid.iter().find(|d| d.date == date).unwrap().level;
        assert_eq!(level_of("2025-01-27"), 4);
        assert_eq!(level_of("2025-01-28"), 3);
        assert_eq!(level_of("2025-01-29"), 2);
        assert_eq!(level_of("2025-01-30"), 1);
        assert_eq!(level_of("2025-01-31"), 0);
    }

    #[test]
    fn future_days_get_sentinel_level() {
        let daily = daily(&[("2025-02-03", 3_600.0, 100)]);
        let grid = build(&daily, HEATMAP_WEEKS, &Utc, now());
        // now() is Monday; Tuesday through Sunday of this week are future.
        let tuesday = grid.iter().find(|d| d.date == "2025-02-04").unwrap();
        assert_eq!(tuesday.level, -1);
        let monday = grid.iter().find(|d| d.date == "2025-02-03").unwrap();
        assert_eq!(monday.level, 4);
    }

    #[test]
    fn empty_history_is_all_zero_levels() {
        let grid = build(&BTreeMap::new(), HEATMAP_WEEKS, &Utc, now());
        assert_eq!(grid.len(), HEATMAP_WEEKS * 7);
        assert!(grid
            .iter()
            .all(|d| d.level == 0 || d.level == -1));
    }
}
