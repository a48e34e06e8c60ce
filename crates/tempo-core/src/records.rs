//! All-time personal bests.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::Serialize;

use crate::classifier;
use crate::event::Event;
use crate::period::DayRecord;
use crate::report::DailyStat;
use crate::session::Session;
use crate::streak::{self, StreakInfo};
use crate::timeops;

/// All-time records over the loaded window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Records {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_productive_day: Option<DayRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_session: Option<SessionRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_daily_output: Option<DayRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_streak: Option<StreakRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_start: Option<TimeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_end: Option<TimeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_languages_day: Option<LanguagesDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub date: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakRecord {
    pub day_count: u32,
    pub start_date: String,
    pub end_date: String,
    pub total_time: f64,
}

/// A local-hour record with the date it first occurred on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRecord {
    pub time: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguagesDay {
    pub date: String,
    pub languages: Vec<String>,
    pub count: usize,
}

/// Finds all-time bests. Events must be sorted ascending by timestamp so the
/// earliest/latest hour records keep the date of first occurrence.
pub fn find<Tz: TimeZone>(
    events: &[Event],
    daily: &BTreeMap<String, DailyStat>,
    streaks: &StreakInfo,
    sessions: &[Session],
    sessions_by_day: &BTreeMap<String, Vec<Session>>,
    tz: &Tz,
) -> Records {
    if events.is_empty() {
        return Records::default();
    }

    let mut records = Records {
        most_productive_day: best_day(daily, sessions_by_day, |d| d.time),
        highest_daily_output: best_day(daily, sessions_by_day, |d| d.lines as f64),
        ..Records::default()
    };

    if let Some(longest) = max_session(sessions) {
        records.longest_session = Some(SessionRecord {
            date: timeops::date_string(longest.start_time, tz),
            start: longest.start_time,
            end: longest.end_time,
            duration: longest.duration,
        });
    }

    records.best_streak = best_streak(events, streaks, sessions_by_day, tz);

    let mut earliest: Option<(u32, String)> = None;
    let mut latest: Option<(u32, String)> = None;
    for event in events {
        let hour = event.timestamp.with_timezone(tz).hour();
        let date = timeops::date_string(event.timestamp, tz);
        if earliest.as_ref().map_or(true, |(h, _)| hour < *h) {
            earliest = Some((hour, date.clone()));
        }
        if latest.as_ref().map_or(true, |(h, _)| hour > *h) {
            latest = Some((hour, date));
        }
    }
    records.earliest_start = earliest.map(|(hour, date)| TimeRecord {
        time: format!("{hour:02}:00"),
        date,
    });
    records.latest_end = latest.map(|(hour, date)| TimeRecord {
        time: format!("{hour:02}:00"),
        date,
    });

    records.most_languages_day = most_languages_day(events, tz);

    records
}

fn best_day(
    daily: &BTreeMap<String, DailyStat>,
    sessions_by_day: &BTreeMap<String, Vec<Session>>,
    metric: impl Fn(&DailyStat) -> f64,
) -> Option<DayRecord> {
    let mut best: Option<(&String, &DailyStat)> = None;
    for (date, stat) in daily {
        // Earlier dates win ties; the map iterates in date order.
        if best.map_or(true, |(_, b)| metric(stat) > metric(b)) {
            best = Some((date, stat));
        }
    }
    best.map(|(date, stat)| DayRecord {
        date: date.clone(),
        weekday: timeops::weekday_name(date),
        time: stat.time,
        lines: stat.lines,
        session_count: sessions_by_day.get(date).map_or(0, Vec::len),
        languages: Vec::new(),
        projects: Vec::new(),
    })
}

fn max_session(sessions: &[Session]) -> Option<&Session> {
    let mut best: Option<&Session> = None;
    for session in sessions {
        if best.map_or(true, |b| session.duration > b.duration) {
            best = Some(session);
        }
    }
    best
}

fn best_streak<Tz: TimeZone>(
    events: &[Event],
    streaks: &StreakInfo,
    sessions_by_day: &BTreeMap<String, Vec<Session>>,
    tz: &Tz,
) -> Option<StreakRecord> {
    if streaks.longest == 0 {
        return None;
    }
    let (start, end) = streak::longest_streak_range(events, tz)?;

    let mut total_time = 0.0;
    let mut day = start;
    while day <= end {
        let key = day.format("%Y-%m-%d").to_string();
        if let Some(sessions) = sessions_by_day.get(&key) {
            total_time += sessions.iter().map(|s| s.duration).sum::<f64>();
        }
        day = day + chrono::Duration::days(1);
    }

    Some(StreakRecord {
        day_count: streaks.longest,
        start_date: start.format("%Y-%m-%d").to_string(),
        end_date: end.format("%Y-%m-%d").to_string(),
        total_time,
    })
}

fn most_languages_day<Tz: TimeZone>(events: &[Event], tz: &Tz) -> Option<LanguagesDay> {
    let mut by_date: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for event in events {
        if !classifier::is_valid_language(&event.language) {
            continue;
        }
        by_date
            .entry(timeops::date_string(event.timestamp, tz))
            .or_default()
            .insert(classifier::normalize(&event.language));
    }

    let mut best: Option<(&String, &BTreeSet<String>)> = None;
    for (date, langs) in &by_date {
        if best.map_or(true, |(_, b)| langs.len() > b.len()) {
            best = Some((date, langs));
        }
    }
    best.map(|(date, langs)| LanguagesDay {
        date: date.clone(),
        languages: langs.iter().cloned().collect(),
        count: langs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session;

    fn event(ts: &str, language: &str, lines: i64) -> Event {
        Event {
            id: format!("{ts}-{language}"),
            timestamp: ts.parse().unwrap(),
            duration: 0.0,
            lines,
            language: language.to_string(),
            project: "p".to_string(),
            editor: "neovim".to_string(),
            file: "main.go".to_string(),
            branch: None,
            is_write: true,
        }
    }

    struct Fixture {
        events: Vec<Event>,
        daily: BTreeMap<String, DailyStat>,
        streaks: StreakInfo,
        sessions: Vec<Session>,
        sessions_by_day: BTreeMap<String, Vec<Session>>,
    }

    impl Fixture {
        fn new(mut events: Vec<Event>, now: &str) -> Self {
            session::assign_durations(&mut events);
            let sessions = session::build_sessions(&events, false);
            let mut sessions_by_day: BTreeMap<String, Vec<Session>> = BTreeMap::new();
            for s in &sessions {
                sessions_by_day
                    .entry(timeops::date_string(s.start_time, &Utc))
                    .or_default()
                    .push(s.clone());
            }
            let mut daily = BTreeMap::new();
            for (date, agg) in crate::aggregate::by_day(&events, &Utc) {
                daily.insert(
                    date.clone(),
                    DailyStat {
                        date,
                        time: agg.time,
                        lines: agg.lines,
                        files: agg.files.len(),
                        session_count: 0,
                    },
                );
            }
            let streaks = streak::compute(&events, &Utc, now.parse().unwrap());
            Self {
                events,
                daily,
                streaks,
                sessions,
                sessions_by_day,
            }
        }

        fn find(&self) -> Records {
            find(
                &self.events,
                &self.daily,
                &self.streaks,
                &self.sessions,
                &self.sessions_by_day,
                &Utc,
            )
        }
    }

    #[test]
    fn empty_events_yield_empty_records() {
        let records = find(
            &[],
            &BTreeMap::new(),
            &StreakInfo::default(),
            &[],
            &BTreeMap::new(),
            &Utc,
        );
        assert_eq!(records, Records::default());
    }

    #[test]
    fn finds_most_productive_and_highest_output_days() {
        let fx = Fixture::new(
            vec![
                event("2025-01-13T10:00:00Z", "go", 5),
                event("2025-01-13T10:10:00Z", "go", 5),
                event("2025-01-14T10:00:00Z", "go", 900),
                event("2025-01-14T10:01:00Z", "go", 0),
            ],
            "2025-01-15T12:00:00Z",
        );
        let records = fx.find();
        let best = records.most_productive_day.unwrap();
        assert_eq!(best.date, "2025-01-13");
        assert!(best.session_count >= 1);
        let output = records.highest_daily_output.unwrap();
        assert_eq!(output.date, "2025-01-14");
        assert_eq!(output.lines, 900);
    }

    #[test]
    fn longest_session_record() {
        let fx = Fixture::new(
            vec![
                event("2025-01-13T10:00:00Z", "go", 5),
                event("2025-01-13T10:10:00Z", "go", 5),
                event("2025-01-14T10:00:00Z", "go", 5),
                event("2025-01-14T10:02:00Z", "go", 5),
            ],
            "2025-01-15T12:00:00Z",
        );
        let records = fx.find();
        let longest = records.longest_session.unwrap();
        assert_eq!(longest.date, "2025-01-13");
        assert!((longest.duration - 720.0).abs() < 1e-9);
    }

    #[test]
    fn earliest_keeps_first_occurrence_date() {
        let fx = Fixture::new(
            vec![
                event("2025-01-13T07:00:00Z", "go", 5),
                event("2025-01-14T07:30:00Z", "go", 5),
                event("2025-01-14T22:15:00Z", "go", 5),
            ],
            "2025-01-15T12:00:00Z",
        );
        let records = fx.find();
        let earliest = records.earliest_start.unwrap();
        assert_eq!(earliest.time, "07:00");
        assert_eq!(earliest.date, "2025-01-13");
        let latest = records.latest_end.unwrap();
        assert_eq!(latest.time, "22:00");
        assert_eq!(latest.date, "2025-01-14");
    }

    #[test]
    fn most_languages_day_counts_valid_normalized() {
        let fx = Fixture::new(
            vec![
                event("2025-01-13T10:00:00Z", "Go", 5),
                event("2025-01-13T10:01:00Z", "rust", 5),
                event("2025-01-13T10:02:00Z", "unknown", 5),
                event("2025-01-14T10:00:00Z", "go", 5),
            ],
            "2025-01-15T12:00:00Z",
        );
        let records = fx.find();
        let polyglot = records.most_languages_day.unwrap();
        assert_eq!(polyglot.date, "2025-01-13");
        assert_eq!(polyglot.count, 2);
        assert_eq!(polyglot.languages, vec!["go", "rust"]);
    }

    #[test]
    fn best_streak_sums_session_time_over_range() {
        let fx = Fixture::new(
            vec![
                event("2025-01-13T10:00:00Z", "go", 5),
                event("2025-01-13T10:10:00Z", "go", 5),
                event("2025-01-14T10:00:00Z", "go", 5),
                event("2025-01-14T10:10:00Z", "go", 5),
                event("2025-01-15T10:00:00Z", "go", 5),
                event("2025-01-15T10:10:00Z", "go", 5),
            ],
            "2025-01-15T12:00:00Z",
        );
        let records = fx.find();
        let best = records.best_streak.unwrap();
        assert_eq!(best.day_count, 3);
        assert_eq!(best.start_date, "2025-01-13");
        assert_eq!(best.end_date, "2025-01-15");
        assert!((best.total_time - 3.0 * 720.0).abs() < 1e-9);
    }
}
