//! The raw activity event emitted by editors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed edit tick.
///
/// Events are immutable once persisted. The `duration` field is never stored:
/// it is zero at rest and assigned in memory by
/// [`session::assign_durations`](crate::session::assign_durations) from the
/// gap to the following event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Inferred working time in seconds.
    #[serde(default)]
    pub duration: f64,
    /// Lines changed in this edit tick. May be zero or negative.
    #[serde(default)]
    pub lines: i64,
    /// Language as reported by the emitter, not normalized on ingest.
    pub language: String,
    pub project: String,
    #[serde(default)]
    pub editor: String,
    /// File path; may be empty.
    #[serde(default)]
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default)]
    pub is_write: bool,
}

impl Event {
    /// Seconds between this event and `other` (positive when `other` is later).
    pub fn gap_seconds(&self, other: &Event) -> f64 {
        (other.timestamp - self.timestamp).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_at(secs: i64) -> Event {
        Event {
            id: format!("e-{secs}"),
            timestamp: DateTime::from_timestamp(secs, 0).unwrap(),
            duration: 0.0,
            lines: 0,
            language: "rust".to_string(),
            project: "tempo".to_string(),
            editor: "helix".to_string(),
            file: "src/lib.rs".to_string(),
            branch: None,
            is_write: true,
        }
    }

    #[test]
    fn gap_seconds_between_events() {
        let a = event_at(1_000);
        let b = event_at(1_300);
        assert!((a.gap_seconds(&b) - 300.0).abs() < f64::EPSILON);
        assert!((b.gap_seconds(&a) + 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serde_roundtrip_omits_missing_branch() {
        let event = event_at(42);
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("branch").is_none());
        let parsed: Event = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }
}
