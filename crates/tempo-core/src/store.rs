//! Storage contract for persisted events and daily rollups.
//!
//! The engine never talks to a database directly; it goes through [`Store`].
//! `tempo-db` provides the SQLite implementation, and tests drive the
//! pipeline with an in-memory double.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::Event;

/// Errors surfaced by a [`Store`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An event with this id already exists.
    #[error("duplicate event id: {0}")]
    Conflict(String),
    /// Underlying storage fault.
    #[error("storage error: {0}")]
    Io(String),
}

/// Pre-aggregated totals over an inclusive local-date range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodSummary {
    pub total_time: f64,
    pub total_lines: i64,
    pub activity_count: i64,
}

/// Per-language rollup row. The language column is raw as-ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageSummary {
    pub language: String,
    pub total_time: f64,
    pub total_lines: i64,
}

/// Per-project rollup row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub project: String,
    pub total_time: f64,
    pub total_lines: i64,
    pub main_language: Option<String>,
}

/// Per-editor rollup row.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSummary {
    pub editor: String,
    pub total_time: f64,
    pub total_lines: i64,
}

/// Append-only event log plus derived daily rollups.
///
/// `append` is atomic: the event insert and all four rollup upserts commit in
/// one transaction. Summary queries cover the inclusive local-date range of
/// `[from, to]`; a `from` equal to the Unix epoch means "from the beginning".
pub trait Store {
    /// Persists one event and updates the rollups. Fails with
    /// [`StoreError::Conflict`] when the id is not unique.
    fn append(&mut self, event: &Event) -> Result<(), StoreError>;

    /// Events with `timestamp >= since`, ascending by timestamp.
    fn activities_since(&self, since: DateTime<Utc>) -> Result<Vec<Event>, StoreError>;

    /// Total number of persisted events.
    fn activity_count(&self) -> Result<i64, StoreError>;

    fn period_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<PeriodSummary, StoreError>;

    fn language_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LanguageSummary>, StoreError>;

    fn project_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ProjectSummary>, StoreError>;

    fn editor_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EditorSummary>, StoreError>;

    /// Wipes and re-derives all rollup tables by replaying the event log.
    fn rebuild_rollups(&mut self) -> Result<(), StoreError>;

    /// Storage maintenance: reclaim space, refresh statistics.
    fn optimize(&mut self) -> Result<(), StoreError>;
}
