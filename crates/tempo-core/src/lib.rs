//! Core analytics engine for the tempo coding-activity tracker.
//!
//! This crate turns a time-ordered stream of raw edit events into a full
//! multi-period report:
//! - Duration inference: per-event durations reconstructed from inter-event gaps
//! - Session reconstruction: idle-timeout grouping with breaks and an active flag
//! - Aggregation: language/project/editor/file/day/hour folds and top lists
//! - Longitudinal views: streaks, heatmap, achievements, all-time records
//!
//! Everything here is pure over its inputs; persistence lives behind the
//! [`Store`] trait, implemented by `tempo-db`.

pub mod achievements;
pub mod aggregate;
pub mod cache;
pub mod calculator;
pub mod classifier;
pub mod event;
pub mod focus;
pub mod heatmap;
pub mod ingest;
pub mod period;
pub mod records;
pub mod report;
pub mod session;
pub mod store;
pub mod streak;
pub mod timeops;

pub use achievements::{Achievement, Rule, RuleKind};
pub use cache::ReportCache;
pub use calculator::{CalculateOptions, Calculator, DEFAULT_LOOKBACK_DAYS};
pub use classifier::{LanguageClass, Proficiency};
pub use event::Event;
pub use heatmap::{HeatmapDay, HEATMAP_WEEKS};
pub use ingest::TrackRequest;
pub use period::{DailyGoals, DayRecord, PeriodReport};
pub use records::Records;
pub use report::{AllReport, DailyStat, ReportMeta};
pub use session::{Session, IDLE_CAP_SECS, MIN_SESSION_SECS, SESSION_TIMEOUT_SECS};
pub use store::{
    EditorSummary, LanguageSummary, PeriodSummary, ProjectSummary, Store, StoreError,
};
pub use streak::StreakInfo;
