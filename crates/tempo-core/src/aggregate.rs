//! Stateless folds over a slice of events with inferred durations.
//!
//! Each fold visits every event once and returns a `BTreeMap` so downstream
//! report output is deterministic.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeZone, Timelike, Utc};

use crate::classifier;
use crate::event::Event;
use crate::timeops;

#[derive(Debug, Clone, Default)]
pub struct LanguageAgg {
    pub time: f64,
    pub lines: i64,
    pub files: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectAgg {
    pub time: f64,
    pub lines: i64,
    pub files: BTreeSet<String>,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileAgg {
    pub time: f64,
    pub lines: i64,
    pub last_edited: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct DayAgg {
    pub time: f64,
    pub lines: i64,
    pub files: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub projects: BTreeSet<String>,
}

/// Time, lines and distinct files per normalized language.
///
/// Events with invalid languages are dropped.
pub fn by_language(events: &[Event]) -> BTreeMap<String, LanguageAgg> {
    let mut map: BTreeMap<String, LanguageAgg> = BTreeMap::new();
    for event in events {
        if !classifier::is_valid_language(&event.language) {
            continue;
        }
        let agg = map.entry(classifier::normalize(&event.language)).or_default();
        agg.time += event.duration;
        agg.lines += event.lines;
        if !event.file.is_empty() {
            agg.files.insert(event.file.clone());
        }
    }
    map
}

/// Time, lines, distinct files and last activity per project.
pub fn by_project(events: &[Event]) -> BTreeMap<String, ProjectAgg> {
    let mut map: BTreeMap<String, ProjectAgg> = BTreeMap::new();
    for event in events {
        let agg = map.entry(event.project.clone()).or_insert_with(|| ProjectAgg {
            time: 0.0,
            lines: 0,
            files: BTreeSet::new(),
            last_active: event.timestamp,
        });
        agg.time += event.duration;
        agg.lines += event.lines;
        if !event.file.is_empty() {
            agg.files.insert(event.file.clone());
        }
        if event.timestamp > agg.last_active {
            agg.last_active = event.timestamp;
        }
    }
    map
}

/// Accumulated time per editor.
pub fn by_editor(events: &[Event]) -> BTreeMap<String, f64> {
    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    for event in events {
        *map.entry(event.editor.clone()).or_default() += event.duration;
    }
    map
}

/// Time, lines and last edit per file. Empty paths are skipped.
pub fn by_file(events: &[Event]) -> BTreeMap<String, FileAgg> {
    let mut map: BTreeMap<String, FileAgg> = BTreeMap::new();
    for event in events {
        if event.file.is_empty() {
            continue;
        }
        let agg = map.entry(event.file.clone()).or_insert_with(|| FileAgg {
            time: 0.0,
            lines: 0,
            last_edited: event.timestamp,
        });
        agg.time += event.duration;
        agg.lines += event.lines;
        if event.timestamp > agg.last_edited {
            agg.last_edited = event.timestamp;
        }
    }
    map
}

/// Per-local-date totals with distinct file, language and project sets.
pub fn by_day<Tz: TimeZone>(events: &[Event], tz: &Tz) -> BTreeMap<String, DayAgg> {
    let mut map: BTreeMap<String, DayAgg> = BTreeMap::new();
    for event in events {
        let date = timeops::date_string(event.timestamp, tz);
        let agg = map.entry(date).or_default();
        agg.time += event.duration;
        agg.lines += event.lines;
        if !event.file.is_empty() {
            agg.files.insert(event.file.clone());
        }
        if classifier::is_valid_language(&event.language) {
            agg.languages.insert(classifier::normalize(&event.language));
        }
        if !event.project.is_empty() {
            agg.projects.insert(event.project.clone());
        }
    }
    map
}

/// Accumulated duration per local hour of day.
pub fn by_hour<Tz: TimeZone>(events: &[Event], tz: &Tz) -> [f64; 24] {
    let mut hours = [0.0; 24];
    for event in events {
        let hour = event.timestamp.with_timezone(tz).hour() as usize;
        hours[hour] += event.duration;
    }
    hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn event(ts: &str, language: &str, project: &str, file: &str, lines: i64) -> Event {
        Event {
            id: format!("{ts}-{file}"),
            timestamp: ts.parse().unwrap(),
            duration: 60.0,
            lines,
            language: language.to_string(),
            project: project.to_string(),
            editor: "neovim".to_string(),
            file: file.to_string(),
            branch: None,
            is_write: true,
        }
    }

    fn sample() -> Vec<Event> {
        vec![
            event("2025-01-15T10:00:00Z", "Go", "api", "main.go", 30),
            event("2025-01-15T10:01:00Z", "go", "api", "handler.go", 20),
            event("2025-01-15T11:00:00Z", "unknown", "api", "notes.txt", 5),
            event("2025-01-16T09:00:00Z", "rust", "cli", "main.rs", 50),
        ]
    }

    #[test]
    fn by_language_normalizes_and_drops_invalid() {
        let map = by_language(&sample());
        assert_eq!(map.len(), 2);
        let go = &map["go"];
        assert!((go.time - 120.0).abs() < f64::EPSILON);
        assert_eq!(go.lines, 50);
        assert_eq!(go.files.len(), 2);
        assert!(!map.contains_key("unknown"));
    }

    #[test]
    fn by_project_tracks_files_and_last_active() {
        let map = by_project(&sample());
        let api = &map["api"];
        assert_eq!(api.files.len(), 3);
        assert_eq!(
            api.last_active,
            "2025-01-15T11:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!((map["cli"].time - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn by_editor_accumulates_time() {
        let map = by_editor(&sample());
        assert!((map["neovim"] - 240.0).abs() < f64::EPSILON);
    }

    #[test]
    fn by_file_skips_empty_paths() {
        let mut events = sample();
        events.push(event("2025-01-16T10:00:00Z", "rust", "cli", "", 5));
        let map = by_file(&events);
        assert_eq!(map.len(), 4);
        assert!((map["main.go"].time - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn by_day_splits_on_local_midnight() {
        let events = vec![event("2025-01-16T04:30:00Z", "go", "p", "a.go", 10)];
        let utc_days = by_day(&events, &Utc);
        assert!(utc_days.contains_key("2025-01-16"));

        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let est_days = by_day(&events, &est);
        assert!(est_days.contains_key("2025-01-15"));
    }

    #[test]
    fn by_day_collects_distinct_sets() {
        let map = by_day(&sample(), &Utc);
        let day = &map["2025-01-15"];
        assert_eq!(day.files.len(), 3);
        assert_eq!(day.languages.iter().collect::<Vec<_>>(), vec!["go"]);
        assert_eq!(day.projects.iter().collect::<Vec<_>>(), vec!["api"]);
        assert_eq!(day.lines, 55);
    }

    #[test]
    fn by_hour_buckets_duration() {
        let hours = by_hour(&sample(), &Utc);
        assert!((hours[10] - 120.0).abs() < f64::EPSILON);
        assert!((hours[11] - 60.0).abs() < f64::EPSILON);
        assert!((hours[9] - 60.0).abs() < f64::EPSILON);
        assert!((hours[0] - 0.0).abs() < f64::EPSILON);
    }
}
