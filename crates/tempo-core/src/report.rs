//! The assembled multi-period report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::achievements::Achievement;
use crate::heatmap::HeatmapDay;
use crate::period::PeriodReport;
use crate::records::Records;
use crate::streak::StreakInfo;

/// Totals for one local date in the `daily_activity` map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStat {
    pub date: String,
    pub time: f64,
    pub lines: i64,
    pub files: usize,
    pub session_count: usize,
}

/// Performance and provenance metadata, serialized as `_meta`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub loaded_activities: usize,
    pub total_activities: i64,
    pub query_time_ms: f64,
    pub data_window: String,
}

/// The complete report returned by the calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllReport {
    pub today: PeriodReport,
    pub yesterday: PeriodReport,
    pub this_week: PeriodReport,
    pub last_week: PeriodReport,
    pub this_month: PeriodReport,
    pub last_month: PeriodReport,
    pub all_time: PeriodReport,
    pub streak_info: StreakInfo,
    pub achievements: Vec<Achievement>,
    pub records: Records,
    pub daily_activity: BTreeMap<String, DailyStat>,
    pub weekly_heatmap: Vec<HeatmapDay>,
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "_meta")]
    pub meta: ReportMeta,
}
