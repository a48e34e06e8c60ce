//! Duration inference and session reconstruction.
//!
//! Raw events carry no duration. A single pass over the time-ordered slice
//! assigns each event the gap to its successor, with the final event of a
//! session contributing [`IDLE_CAP_SECS`] as an assumed tail of work, then
//! groups runs of events separated by at most [`SESSION_TIMEOUT_SECS`] into
//! sessions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::classifier;
use crate::event::Event;

/// Maximum seconds a session-terminating event may contribute.
pub const IDLE_CAP_SECS: f64 = 120.0;

/// Gap beyond which a new session starts.
pub const SESSION_TIMEOUT_SECS: f64 = 15.0 * 60.0;

/// Sessions spanning less than this are discarded.
pub const MIN_SESSION_SECS: f64 = 60.0;

/// A maximal run of events each within the session timeout of the previous.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Id of the first event in the session.
    pub id: String,
    pub start_time: DateTime<Utc>,
    /// Timestamp of the last event in the session, not extended by the cap.
    pub end_time: DateTime<Utc>,
    /// Sum of member events' inferred durations in seconds.
    pub duration: f64,
    pub projects: Vec<String>,
    /// Distinct valid languages, normalized and sorted.
    pub languages: Vec<String>,
    pub is_active: bool,
    /// Seconds until the next session starts; zero for the last session.
    pub break_after: f64,
}

/// Assigns each event its inferred duration from the gap to the next event.
///
/// Sorts the slice by timestamp first. Within a session the raw gap is kept
/// (it is at most the session timeout); an event that terminates its session
/// contributes [`IDLE_CAP_SECS`].
pub fn assign_durations(events: &mut [Event]) {
    events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let len = events.len();
    for i in 0..len {
        if i + 1 == len {
            events[i].duration = IDLE_CAP_SECS;
            continue;
        }
        let gap = events[i].gap_seconds(&events[i + 1]);
        events[i].duration = if gap > SESSION_TIMEOUT_SECS {
            IDLE_CAP_SECS
        } else {
            gap.max(0.0)
        };
    }
}

/// Groups events into sessions.
///
/// Expects the slice sorted ascending with durations already assigned.
/// Sessions whose event span is shorter than [`MIN_SESSION_SECS`] are
/// discarded. When `mark_last_active` is set, the final retained session is
/// flagged active (the caller's window ends at "now").
pub fn build_sessions(events: &[Event], mark_last_active: bool) -> Vec<Session> {
    let mut sessions = Vec::new();
    let mut builder: Option<SessionAccumulator> = None;

    for event in events {
        let continues = builder
            .as_ref()
            .map_or(false, |acc| acc.end.gap_seconds(event) <= SESSION_TIMEOUT_SECS);
        if continues {
            if let Some(acc) = builder.as_mut() {
                acc.push(event);
            }
        } else {
            if let Some(done) = builder.take() {
                if let Some(session) = done.finish() {
                    sessions.push(session);
                }
            }
            builder = Some(SessionAccumulator::start(event));
        }
    }
    if let Some(done) = builder.take() {
        if let Some(session) = done.finish() {
            sessions.push(session);
        }
    }

    for i in 0..sessions.len().saturating_sub(1) {
        let gap = (sessions[i + 1].start_time - sessions[i].end_time).num_milliseconds() as f64
            / 1000.0;
        sessions[i].break_after = gap.max(0.0);
    }

    if mark_last_active {
        if let Some(last) = sessions.last_mut() {
            last.is_active = true;
        }
    }

    sessions
}

struct SessionAccumulator {
    id: String,
    start: Event,
    end: Event,
    duration: f64,
    projects: BTreeSet<String>,
    languages: BTreeSet<String>,
}

impl SessionAccumulator {
    fn start(event: &Event) -> Self {
        let mut acc = Self {
            id: event.id.clone(),
            start: event.clone(),
            end: event.clone(),
            duration: 0.0,
            projects: BTreeSet::new(),
            languages: BTreeSet::new(),
        };
        acc.absorb(event);
        acc
    }

    fn push(&mut self, event: &Event) {
        self.end = event.clone();
        self.absorb(event);
    }

    fn absorb(&mut self, event: &Event) {
        self.duration += event.duration;
        if !event.project.is_empty() {
            self.projects.insert(event.project.clone());
        }
        if classifier::is_valid_language(&event.language) {
            self.languages.insert(classifier::normalize(&event.language));
        }
    }

    fn finish(self) -> Option<Session> {
        let span = self.start.gap_seconds(&self.end);
        if span < MIN_SESSION_SECS {
            return None;
        }
        Some(Session {
            id: self.id,
            start_time: self.start.timestamp,
            end_time: self.end.timestamp,
            duration: self.duration,
            projects: self.projects.into_iter().collect(),
            languages: self.languages.into_iter().collect(),
            is_active: false,
            break_after: 0.0,
        })
    }
}
