//! TTL-gated in-memory holder for the last computed report.
//!
//! Invalidation is per-process: the ingest path calls [`ReportCache::
//! invalidate`] after every successful append, so a following `calculate`
//! recomputes. Readers take a shared lock, writers an exclusive one.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::report::AllReport;

/// Default time-to-live for a cached report.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

struct Slot {
    report: AllReport,
    stored_at: Instant,
}

/// Single-slot report cache.
pub struct ReportCache {
    ttl: Duration,
    slot: RwLock<Option<Slot>>,
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns a copy of the cached report when it is still fresh.
    pub fn get(&self) -> Option<AllReport> {
        let guard = self.slot.read().unwrap_or_else(|e| e.into_inner());
        let slot = guard.as_ref()?;
        if slot.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(slot.report.clone())
    }

    pub fn set(&self, report: AllReport) {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Slot {
            report,
            stored_at: Instant::now(),
        });
    }

    pub fn invalidate(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
