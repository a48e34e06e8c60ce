//! Report orchestration: one store load, one session pass, seven periods.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::aggregate;
use crate::achievements;
use crate::cache::ReportCache;
use crate::classifier;
use crate::event::Event;
use crate::heatmap::{self, HEATMAP_WEEKS};
use crate::period::{self, PeriodContext};
use crate::records;
use crate::report::{AllReport, DailyStat, ReportMeta};
use crate::session::{self, Session};
use crate::store::{Store, StoreError};
use crate::streak;
use crate::timeops;

/// Default event-load window in days.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// How far back a language counts as trending.
const TRENDING_WINDOW_DAYS: i64 = 7;

/// Controls how much history a calculation loads.
#[derive(Debug, Clone, Copy)]
pub struct CalculateOptions {
    pub load_recent_days: i64,
}

impl Default for CalculateOptions {
    fn default() -> Self {
        Self {
            load_recent_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

/// Builds [`AllReport`]s from a [`Store`].
pub struct Calculator<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> Calculator<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Computes the full report, consulting and populating the cache.
    pub fn calculate<S: Store>(
        &self,
        store: &S,
        cache: &ReportCache,
        opts: CalculateOptions,
    ) -> Result<AllReport, StoreError> {
        self.calculate_at(store, cache, opts, Utc::now())
    }

    /// Like [`Calculator::calculate`] with an explicit "now" instant.
    pub fn calculate_at<S: Store>(
        &self,
        store: &S,
        cache: &ReportCache,
        opts: CalculateOptions,
        now: DateTime<Utc>,
    ) -> Result<AllReport, StoreError> {
        if let Some(mut report) = cache.get() {
            report.generated_at = now;
            return Ok(report);
        }

        let started = Instant::now();
        let days = if opts.load_recent_days > 0 {
            opts.load_recent_days
        } else {
            DEFAULT_LOOKBACK_DAYS
        };

        let mut events = store.activities_since(now - Duration::days(days))?;
        // The store returns rows ordered, but sort defensively: the whole
        // pipeline assumes ascending timestamps.
        session::assign_durations(&mut events);

        let sessions = session::build_sessions(&events, true);
        let sessions_by_day = index_sessions_by_day(&sessions, &self.tz);

        let lifetime_hours = self.lifetime_hours(store, &events, now)?;
        let project_language_time = project_language_time(&events);
        let recent_languages = recent_languages(&events, now);

        let ctx = PeriodContext {
            lifetime_hours: &lifetime_hours,
            project_language_time: &project_language_time,
            recent_languages: &recent_languages,
            sessions: &sessions,
            sessions_by_day: &sessions_by_day,
        };

        let today_start = timeops::start_of_day(now, &self.tz);
        let yesterday_start = timeops::start_of_day(now - Duration::days(1), &self.tz);
        let week_start = timeops::start_of_week(now, &self.tz);
        let last_week_start = timeops::start_of_week(now - Duration::days(7), &self.tz);
        let month_start = timeops::start_of_month(now, &self.tz);
        let last_month_start =
            timeops::start_of_month(month_start - Duration::days(1), &self.tz);
        let next_month_start =
            timeops::start_of_month(month_start + Duration::days(32), &self.tz);
        let earliest = events.first().map_or(now, |e| e.timestamp);

        let today = period::build_period(
            "today",
            today_start,
            now,
            window(&events, today_start, today_start + Duration::days(1)),
            &ctx,
            &self.tz,
        );
        let yesterday = period::build_period(
            "yesterday",
            yesterday_start,
            today_start,
            window(&events, yesterday_start, today_start),
            &ctx,
            &self.tz,
        );
        let this_week = period::build_period(
            "this_week",
            week_start,
            now,
            window(&events, week_start, week_start + Duration::days(7)),
            &ctx,
            &self.tz,
        );
        let last_week = period::build_period(
            "last_week",
            last_week_start,
            week_start,
            window(&events, last_week_start, week_start),
            &ctx,
            &self.tz,
        );
        let this_month = period::build_period(
            "this_month",
            month_start,
            now,
            window(&events, month_start, next_month_start),
            &ctx,
            &self.tz,
        );
        let last_month = period::build_period(
            "last_month",
            last_month_start,
            month_start,
            window(&events, last_month_start, month_start),
            &ctx,
            &self.tz,
        );
        let all_time = period::build_period("all_time", earliest, now, &events, &ctx, &self.tz);

        let streak_info = streak::compute(&events, &self.tz, now);

        let daily_activity: BTreeMap<String, DailyStat> =
            aggregate::by_day(&events, &self.tz)
                .into_iter()
                .map(|(date, agg)| {
                    let stat = DailyStat {
                        session_count: sessions_by_day.get(&date).map_or(0, Vec::len),
                        time: agg.time,
                        lines: agg.lines,
                        files: agg.files.len(),
                        date: date.clone(),
                    };
                    (date, stat)
                })
                .collect();

        let weekly_heatmap = heatmap::build(&daily_activity, HEATMAP_WEEKS, &self.tz, now);
        let found_records = records::find(
            &events,
            &daily_activity,
            &streak_info,
            &sessions,
            &sessions_by_day,
            &self.tz,
        );
        let unlocked = achievements::evaluate(&all_time, &streak_info);

        let total_activities = store.activity_count()?;
        let meta = ReportMeta {
            loaded_activities: events.len(),
            total_activities,
            query_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            data_window: format!("last_{days}_days"),
        };
        tracing::debug!(
            loaded = meta.loaded_activities,
            total = meta.total_activities,
            elapsed_ms = meta.query_time_ms,
            "report computed"
        );

        let report = AllReport {
            today,
            yesterday,
            this_week,
            last_week,
            this_month,
            last_month,
            all_time,
            streak_info,
            achievements: unlocked,
            records: found_records,
            daily_activity,
            weekly_heatmap,
            generated_at: now,
            meta,
        };
        cache.set(report.clone());
        Ok(report)
    }

    /// All-time hours per normalized language.
    ///
    /// Starts from the loaded window and folds in the rollup tables' all-time
    /// figures (taking the larger of the two per language), so proficiency
    /// survives a window shorter than history while an unbuilt rollup table
    /// degrades to the window approximation.
    fn lifetime_hours<S: Store>(
        &self,
        store: &S,
        events: &[Event],
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<String, f64>, StoreError> {
        let mut hours: BTreeMap<String, f64> = BTreeMap::new();
        for event in events {
            if classifier::is_valid_language(&event.language) {
                *hours
                    .entry(classifier::normalize(&event.language))
                    .or_insert(0.0) += event.duration / 3600.0;
            }
        }
        // The rollup language column is raw as-ingested; normalize and merge.
        for row in store.language_summary(DateTime::UNIX_EPOCH, now)? {
            if !classifier::is_valid_language(&row.language) {
                continue;
            }
            let lang = classifier::normalize(&row.language);
            let rollup_hours = row.total_time / 3600.0;
            let entry = hours.entry(lang).or_insert(0.0);
            if rollup_hours > *entry {
                *entry = rollup_hours;
            }
        }
        Ok(hours)
    }
}

/// Contiguous slice of events with `from <= timestamp < until`.
///
/// Events must be sorted ascending by timestamp.
fn window(events: &[Event], from: DateTime<Utc>, until: DateTime<Utc>) -> &[Event] {
    let lo = events.partition_point(|e| e.timestamp < from);
    let hi = events.partition_point(|e| e.timestamp < until);
    &events[lo..hi]
}

fn index_sessions_by_day<Tz: TimeZone>(
    sessions: &[Session],
    tz: &Tz,
) -> BTreeMap<String, Vec<Session>> {
    let mut index: BTreeMap<String, Vec<Session>> = BTreeMap::new();
    for session in sessions {
        index
            .entry(timeops::date_string(session.start_time, tz))
            .or_default()
            .push(session.clone());
    }
    index
}

fn project_language_time(events: &[Event]) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut map: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for event in events {
        if !classifier::is_valid_language(&event.language) {
            continue;
        }
        *map.entry(event.project.clone())
            .or_default()
            .entry(classifier::normalize(&event.language))
            .or_insert(0.0) += event.duration;
    }
    map
}

fn recent_languages(events: &[Event], now: DateTime<Utc>) -> BTreeSet<String> {
    let cutoff = now - Duration::days(TRENDING_WINDOW_DAYS);
    events
        .iter()
        .filter(|e| e.timestamp > cutoff && classifier::is_valid_language(&e.language))
        .map(|e| classifier::normalize(&e.language))
        .collect()
}
