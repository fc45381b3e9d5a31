//! Reconcile counters.
//!
//! Records *what the reconciler did* per window: how many notifications of
//! each kind it processed, how often an edit reduced to pure renumbering, and
//! how many handles were created, evicted or pinged. Counters are relaxed
//! atomics so a shared `&Reconciler` can update them.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct ReconcileMetrics {
    /// `on_lines_deleted` calls.
    pub deletes: AtomicU64,
    /// `on_lines_inserted` calls.
    pub inserts: AtomicU64,
    /// `on_lines_changed` calls.
    pub content_changes: AtomicU64,
    /// `on_tokens_changed` calls.
    pub token_changes: AtomicU64,
    /// Whole-window flushes.
    pub flushes: AtomicU64,
    /// Edits fully above the window that only moved `start_line_number`.
    pub shifts: AtomicU64,
    /// Handles obtained from the factory.
    pub handles_created: AtomicU64,
    /// Handles handed back to the caller for disposal.
    pub handles_evicted: AtomicU64,
    /// `on_content_changed` hook invocations.
    pub content_pings: AtomicU64,
    /// `on_tokens_changed` hook invocations.
    pub token_pings: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReconcileMetricsSnapshot {
    pub deletes: u64,
    pub inserts: u64,
    pub content_changes: u64,
    pub token_changes: u64,
    pub flushes: u64,
    pub shifts: u64,
    pub handles_created: u64,
    pub handles_evicted: u64,
    pub content_pings: u64,
    pub token_pings: u64,
}

impl ReconcileMetrics {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64, by: usize) {
        if by > 0 {
            counter.fetch_add(by as u64, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> ReconcileMetricsSnapshot {
        ReconcileMetricsSnapshot {
            deletes: self.deletes.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            content_changes: self.content_changes.load(Ordering::Relaxed),
            token_changes: self.token_changes.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            shifts: self.shifts.load(Ordering::Relaxed),
            handles_created: self.handles_created.load(Ordering::Relaxed),
            handles_evicted: self.handles_evicted.load(Ordering::Relaxed),
            content_pings: self.content_pings.load(Ordering::Relaxed),
            token_pings: self.token_pings.load(Ordering::Relaxed),
        }
    }
}
