//! Per-period report assembly.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::aggregate;
use crate::classifier::{self, Proficiency};
use crate::event::Event;
use crate::focus;
use crate::session::Session;
use crate::timeops;

/// Daily time goal in seconds.
pub const DAILY_TIME_GOAL_SECS: f64 = 4.0 * 3600.0;

/// Daily lines goal.
pub const DAILY_LINES_GOAL: i64 = 500;

/// How many files the top-files list keeps.
pub const TOP_FILES_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageStat {
    pub name: String,
    pub time: f64,
    pub lines: i64,
    pub files: usize,
    pub percent_total: f64,
    pub proficiency: Proficiency,
    pub hours_total: f64,
    pub trending: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStat {
    pub name: String,
    pub time: f64,
    pub lines: i64,
    pub files: usize,
    pub percent_total: f64,
    pub main_lang: String,
    pub last_active: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorStat {
    pub name: String,
    pub time: f64,
    pub percent_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStat {
    pub name: String,
    pub time: f64,
    pub lines: i64,
    pub percent_total: f64,
    pub last_edited: DateTime<Utc>,
}

/// One slot of the 24-hour activity shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySlot {
    pub hour: u32,
    pub duration: f64,
    pub percentage: f64,
    pub is_peak: bool,
}

/// Progress toward the fixed daily goals; only computed for "today".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGoals {
    pub time_goal: f64,
    pub lines_goal: i64,
    pub time_progress: f64,
    pub lines_progress: f64,
    pub on_track: bool,
}

/// A notable day, used both per-period and in the all-time records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: String,
    pub weekday: String,
    pub time: f64,
    pub lines: i64,
    pub session_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
}

/// Full report for one time window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub period: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_time: f64,
    pub total_lines: i64,
    pub total_files: usize,
    pub languages: Vec<LanguageStat>,
    pub projects: Vec<ProjectStat>,
    pub editors: Vec<EditorStat>,
    pub top_files: Vec<FileStat>,
    pub hourly_activity: Vec<HourlySlot>,
    pub peak_hour: u32,
    pub sessions: Vec<Session>,
    pub session_count: usize,
    pub focus_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_goals: Option<DailyGoals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_productive_day: Option<DayRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_daily_output: Option<DayRecord>,
}

/// Inputs shared by all seven period builds.
pub struct PeriodContext<'a> {
    /// All-time hours per normalized language, for proficiency tiers.
    pub lifetime_hours: &'a BTreeMap<String, f64>,
    /// Seconds per (project, normalized language), for main-language picks.
    pub project_language_time: &'a BTreeMap<String, BTreeMap<String, f64>>,
    /// Normalized languages active in the last seven days.
    pub recent_languages: &'a BTreeSet<String>,
    /// The full session list over the loaded window.
    pub sessions: &'a [Session],
    /// Sessions indexed by the local date of their start.
    pub sessions_by_day: &'a BTreeMap<String, Vec<Session>>,
}

/// Builds one period's report from its filtered event slice.
pub fn build_period<Tz: TimeZone>(
    period: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    events: &[Event],
    ctx: &PeriodContext<'_>,
    tz: &Tz,
) -> PeriodReport {
    let total_time: f64 = events.iter().map(|e| e.duration).sum();
    let total_lines: i64 = events.iter().map(|e| e.lines).sum();
    let total_files = events
        .iter()
        .filter(|e| !e.file.is_empty())
        .map(|e| e.file.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let is_today = period == "today";

    let sessions: Vec<Session> = ctx
        .sessions
        .iter()
        .filter(|s| s.start_time >= start && s.start_time < end)
        .cloned()
        .collect();
    let focus_score = focus::focus_score(&sessions);

    let (hourly_activity, peak_hour) = hourly_shape(events, tz);

    let mut report = PeriodReport {
        period: period.to_string(),
        start_date: start,
        end_date: end,
        total_time,
        total_lines,
        total_files,
        languages: language_stats(events, total_time, ctx, is_today),
        projects: project_stats(events, total_time, ctx),
        editors: editor_stats(events, total_time),
        top_files: file_stats(events, total_time),
        hourly_activity,
        peak_hour,
        session_count: sessions.len(),
        sessions,
        focus_score,
        daily_goals: None,
        most_productive_day: None,
        highest_daily_output: None,
    };

    if is_today {
        report.daily_goals = Some(daily_goals(total_time, total_lines));
    } else {
        let days = aggregate::by_day(events, tz);
        report.most_productive_day = pick_day(&days, ctx, |d| d.time);
        report.highest_daily_output = pick_day(&days, ctx, |d| d.lines as f64);
    }

    report
}

fn language_stats(
    events: &[Event],
    total_time: f64,
    ctx: &PeriodContext<'_>,
    is_today: bool,
) -> Vec<LanguageStat> {
    let mut stats: Vec<LanguageStat> = aggregate::by_language(events)
        .into_iter()
        .map(|(name, agg)| {
            let hours_total = ctx.lifetime_hours.get(&name).copied().unwrap_or(0.0);
            let trending = !is_today && ctx.recent_languages.contains(&name);
            LanguageStat {
                percent_total: percent(agg.time, total_time),
                proficiency: classifier::proficiency(hours_total),
                hours_total,
                trending,
                time: agg.time,
                lines: agg.lines,
                files: agg.files.len(),
                name,
            }
        })
        .collect();
    sort_by_time(&mut stats, |s| s.time, |s| s.name.clone());
    stats
}

fn project_stats(events: &[Event], total_time: f64, ctx: &PeriodContext<'_>) -> Vec<ProjectStat> {
    let mut stats: Vec<ProjectStat> = aggregate::by_project(events)
        .into_iter()
        .map(|(name, agg)| {
            let main_lang = main_language(ctx.project_language_time.get(&name));
            ProjectStat {
                percent_total: percent(agg.time, total_time),
                main_lang,
                time: agg.time,
                lines: agg.lines,
                files: agg.files.len(),
                last_active: agg.last_active,
                name,
            }
        })
        .collect();
    sort_by_time(&mut stats, |s| s.time, |s| s.name.clone());
    stats
}

fn editor_stats(events: &[Event], total_time: f64) -> Vec<EditorStat> {
    let mut stats: Vec<EditorStat> = aggregate::by_editor(events)
        .into_iter()
        .map(|(name, time)| EditorStat {
            percent_total: percent(time, total_time),
            time,
            name,
        })
        .collect();
    sort_by_time(&mut stats, |s| s.time, |s| s.name.clone());
    stats
}

fn file_stats(events: &[Event], total_time: f64) -> Vec<FileStat> {
    let mut stats: Vec<FileStat> = aggregate::by_file(events)
        .into_iter()
        .map(|(name, agg)| FileStat {
            percent_total: percent(agg.time, total_time),
            time: agg.time,
            lines: agg.lines,
            last_edited: agg.last_edited,
            name,
        })
        .collect();
    sort_by_time(&mut stats, |s| s.time, |s| s.name.clone());
    stats.truncate(TOP_FILES_LIMIT);
    stats
}

/// Picks the main language for a project: the code language with the most
/// time, falling back to "Mixed" when no code language was seen.
fn main_language(languages: Option<&BTreeMap<String, f64>>) -> String {
    let Some(languages) = languages else {
        return "Mixed".to_string();
    };
    let mut best: Option<(&String, f64)> = None;
    for (lang, &time) in languages {
        if !classifier::is_code(lang) {
            continue;
        }
        if best.map_or(true, |(_, t)| time > t) {
            best = Some((lang, time));
        }
    }
    best.map_or_else(|| "Mixed".to_string(), |(lang, _)| lang.clone())
}

fn hourly_shape<Tz: TimeZone>(events: &[Event], tz: &Tz) -> (Vec<HourlySlot>, u32) {
    let hours = aggregate::by_hour(events, tz);
    let total: f64 = hours.iter().sum();
    let max = hours.iter().copied().fold(0.0_f64, f64::max);

    let slots = hours
        .iter()
        .enumerate()
        .map(|(hour, &duration)| HourlySlot {
            hour: hour as u32,
            duration,
            percentage: percent(duration, total),
            is_peak: max > 0.0 && duration >= max * 0.9,
        })
        .collect();

    let mut peak_hour = 0u32;
    let mut peak = 0.0;
    for (hour, &duration) in hours.iter().enumerate() {
        if duration > peak {
            peak = duration;
            peak_hour = hour as u32;
        }
    }
    (slots, peak_hour)
}

fn daily_goals(total_time: f64, total_lines: i64) -> DailyGoals {
    let time_progress = (percent(total_time, DAILY_TIME_GOAL_SECS)).min(100.0);
    let lines_progress = (percent(total_lines as f64, DAILY_LINES_GOAL as f64)).min(100.0);
    DailyGoals {
        time_goal: DAILY_TIME_GOAL_SECS,
        lines_goal: DAILY_LINES_GOAL,
        time_progress,
        lines_progress,
        on_track: time_progress >= 50.0 || lines_progress >= 50.0,
    }
}

fn pick_day(
    days: &BTreeMap<String, aggregate::DayAgg>,
    ctx: &PeriodContext<'_>,
    metric: impl Fn(&aggregate::DayAgg) -> f64,
) -> Option<DayRecord> {
    let mut best: Option<(&String, &aggregate::DayAgg)> = None;
    for (date, agg) in days {
        // Earlier dates win ties because the map iterates in date order.
        if best.map_or(true, |(_, b)| metric(agg) > metric(b)) {
            best = Some((date, agg));
        }
    }
    best.map(|(date, agg)| DayRecord {
        date: date.clone(),
        weekday: timeops::weekday_name(date),
        time: agg.time,
        lines: agg.lines,
        session_count: ctx.sessions_by_day.get(date).map_or(0, Vec::len),
        languages: agg.languages.iter().cloned().collect(),
        projects: agg.projects.iter().cloned().collect(),
    })
}

fn percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

fn sort_by_time<T>(
    stats: &mut [T],
    time: impl Fn(&T) -> f64,
    name: impl Fn(&T) -> String,
) {
    stats.sort_by(|a, b| {
        time(b)
            .partial_cmp(&time(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| name(a).cmp(&name(b)))
    });
}
