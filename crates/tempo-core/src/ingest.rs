//! External-facing write path.
//!
//! Stamps a fresh id and timestamp, fills placeholder defaults so the stored
//! row always has a nonempty language, project and editor, persists through
//! the store (which updates the rollups transactionally) and drops the cached
//! report.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::cache::ReportCache;
use crate::event::Event;
use crate::store::{Store, StoreError};

/// Placeholder for fields the emitter left blank.
const UNKNOWN: &str = "unknown";

/// One tracked edit, as reported by the editor side.
#[derive(Debug, Clone, Default)]
pub struct TrackRequest {
    pub file: String,
    /// Already resolved by the caller's detector; may still be empty.
    pub language: String,
    pub project: String,
    pub editor: String,
    pub lines: i64,
    pub branch: Option<String>,
    pub is_write: bool,
}

/// Persists one activity and invalidates the report cache.
pub fn track<S: Store>(
    store: &mut S,
    cache: &ReportCache,
    request: TrackRequest,
) -> Result<Event, StoreError> {
    track_at(store, cache, request, Utc::now())
}

/// Like [`track`] with an explicit timestamp.
pub fn track_at<S: Store>(
    store: &mut S,
    cache: &ReportCache,
    request: TrackRequest,
    now: DateTime<Utc>,
) -> Result<Event, StoreError> {
    let event = Event {
        id: Uuid::new_v4().to_string(),
        timestamp: now,
        duration: 0.0,
        lines: request.lines,
        language: or_unknown(request.language),
        project: or_unknown(request.project),
        editor: or_unknown(request.editor),
        file: request.file,
        branch: request.branch,
        is_write: request.is_write,
    };

    store.append(&event)?;
    cache.invalidate();
    tracing::debug!(id = %event.id, project = %event.project, "activity tracked");
    Ok(event)
}

fn or_unknown(value: String) -> String {
    if value.trim().is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}
