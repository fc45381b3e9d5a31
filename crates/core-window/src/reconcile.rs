//! Incremental reconciliation of a [`LineWindow`] against buffer edits.
//!
//! All line numbers are 1-based, inclusive and expressed in pre-edit
//! coordinates. Each operation mutates the window in place and either hands
//! evicted handles back to the caller (deletions, insertions, flushes) or
//! reports whether any cached handle was pinged (content / token changes).
//!
//! Relationship of an edited range to the window `[ws, we]`:
//!
//! | edit                  | deleted                      | inserted                       |
//! |-----------------------|------------------------------|--------------------------------|
//! | entirely above        | `start -= count`             | `start += count`               |
//! | overlapping the start | evict prefix, `start = from` | `start += count` (`from <= ws`) |
//! | strictly inside       | splice out the range         | push tail down, evict overflow |
//! | entirely below        | no-op                        | no-op                          |
//!
//! Insertion inside the window never grows it: with `idx = from - ws` and
//! `tail_available = len - idx`, fewer than `tail_available` inserted lines
//! get fresh handles and push the same number of handles off the far end;
//! otherwise the entire tail is evicted and nothing is created. The window
//! does not refill itself; the host does that on its next visible-range pass.

use crate::handle::{ContentInvalidatable, LineFactory};
use crate::metrics::ReconcileMetrics;
use crate::window::LineWindow;
use core_events::{ChangeEvent, TokenRange};
use tracing::{debug, trace};

/// Result of routing a [`ChangeEvent`] through [`Reconciler::apply`].
#[derive(Debug, PartialEq, Eq)]
pub enum ReconcileOutcome<H> {
    /// Handles removed from the window, ascending by original line number.
    Evicted(Vec<H>),
    /// Whether any cached handle was notified.
    Pinged(bool),
}

impl<H> ReconcileOutcome<H> {
    pub fn evicted(&self) -> &[H] {
        match self {
            ReconcileOutcome::Evicted(v) => v,
            ReconcileOutcome::Pinged(_) => &[],
        }
    }

    pub fn into_evicted(self) -> Vec<H> {
        match self {
            ReconcileOutcome::Evicted(v) => v,
            ReconcileOutcome::Pinged(_) => Vec::new(),
        }
    }

    pub fn pinged(&self) -> bool {
        matches!(self, ReconcileOutcome::Pinged(true))
    }
}

/// Stateless apart from its counters; one instance may serve any number of
/// windows.
#[derive(Debug, Default)]
pub struct Reconciler {
    metrics: ReconcileMetrics,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &ReconcileMetrics {
        &self.metrics
    }

    /// Lines `delete_from..=delete_to` were removed from the buffer.
    pub fn on_lines_deleted<H>(
        &self,
        window: &mut LineWindow<H>,
        delete_from: usize,
        delete_to: usize,
    ) -> Vec<H> {
        debug_assert!(
            delete_from >= 1 && delete_from <= delete_to,
            "malformed delete range {delete_from}..={delete_to}"
        );
        ReconcileMetrics::bump(&self.metrics.deletes, 1);
        if window.is_empty() {
            return Vec::new();
        }
        let ws = window.start_line_number();
        let we = window.end_line_number();

        if delete_from > we {
            trace!(
                target: "window.reconcile",
                delete_from,
                delete_to,
                ws,
                we,
                "delete_below_window"
            );
            return Vec::new();
        }
        if delete_to < ws {
            let removed = delete_to - delete_from + 1;
            window.set_start_line_number(ws - removed);
            ReconcileMetrics::bump(&self.metrics.shifts, 1);
            trace!(
                target: "window.reconcile",
                delete_from,
                delete_to,
                new_start = ws - removed,
                "delete_above_window"
            );
            return Vec::new();
        }

        let evict_lo = delete_from.max(ws) - ws;
        let evict_hi = delete_to.min(we) - ws;
        let evicted: Vec<H> = window.lines_mut().drain(evict_lo..=evict_hi).collect();
        if delete_from < ws {
            // Survivors after the deletion now start where the deletion began.
            window.set_start_line_number(delete_from);
        }
        ReconcileMetrics::bump(&self.metrics.handles_evicted, evicted.len());
        debug!(
            target: "window.reconcile",
            delete_from,
            delete_to,
            evicted = evicted.len(),
            new_start = window.start_line_number(),
            new_len = window.len(),
            "delete_overlaps_window"
        );
        evicted
    }

    /// Lines `insert_from..=insert_to` were inserted into the buffer.
    pub fn on_lines_inserted<H, F>(
        &self,
        window: &mut LineWindow<H>,
        factory: &mut F,
        insert_from: usize,
        insert_to: usize,
    ) -> Vec<H>
    where
        F: LineFactory<H> + ?Sized,
    {
        debug_assert!(
            insert_from >= 1 && insert_from <= insert_to,
            "malformed insert range {insert_from}..={insert_to}"
        );
        ReconcileMetrics::bump(&self.metrics.inserts, 1);
        if window.is_empty() {
            return Vec::new();
        }
        let ws = window.start_line_number();
        let we = window.end_line_number();
        let count = insert_to - insert_from + 1;

        if insert_from <= ws {
            let new_start = ws.saturating_add(count);
            window.set_start_line_number(new_start);
            ReconcileMetrics::bump(&self.metrics.shifts, 1);
            trace!(
                target: "window.reconcile",
                insert_from,
                insert_to,
                new_start,
                "insert_above_window"
            );
            return Vec::new();
        }
        if insert_from > we {
            trace!(
                target: "window.reconcile",
                insert_from,
                insert_to,
                ws,
                we,
                "insert_below_window"
            );
            return Vec::new();
        }

        let len = window.len();
        let idx = insert_from - ws;
        let tail_available = len - idx;
        let lines = window.lines_mut();

        if count < tail_available {
            let evicted = lines.split_off(len - count);
            let fresh: Vec<H> = (0..count).map(|_| factory.create()).collect();
            lines.splice(idx..idx, fresh);
            ReconcileMetrics::bump(&self.metrics.handles_created, count);
            ReconcileMetrics::bump(&self.metrics.handles_evicted, evicted.len());
            debug!(
                target: "window.reconcile",
                insert_from,
                insert_to,
                created = count,
                evicted = evicted.len(),
                "insert_inside_window"
            );
            evicted
        } else {
            let evicted = lines.split_off(idx);
            ReconcileMetrics::bump(&self.metrics.handles_evicted, evicted.len());
            debug!(
                target: "window.reconcile",
                insert_from,
                insert_to,
                tail_available,
                evicted = evicted.len(),
                new_len = idx,
                "insert_overflows_window"
            );
            evicted
        }
    }

    /// Content of `count` lines starting at `from` changed. Returns whether
    /// any cached handle was notified.
    pub fn on_lines_changed<H: ContentInvalidatable>(
        &self,
        window: &mut LineWindow<H>,
        from: usize,
        count: usize,
    ) -> bool {
        ReconcileMetrics::bump(&self.metrics.content_changes, 1);
        if count == 0 {
            return false;
        }
        let span = window.span_mut(from, from.saturating_add(count - 1));
        for handle in span.iter_mut() {
            handle.on_content_changed();
        }
        ReconcileMetrics::bump(&self.metrics.content_pings, span.len());
        trace!(
            target: "window.reconcile",
            from,
            count,
            pinged = span.len(),
            "lines_changed"
        );
        !span.is_empty()
    }

    /// Token metadata changed for each inclusive range. A handle covered by
    /// several ranges is pinged once per range.
    pub fn on_tokens_changed<H: ContentInvalidatable>(
        &self,
        window: &mut LineWindow<H>,
        ranges: &[TokenRange],
    ) -> bool {
        ReconcileMetrics::bump(&self.metrics.token_changes, 1);
        let mut pinged = 0usize;
        for range in ranges {
            let span = window.span_mut(range.from, range.to);
            for handle in span.iter_mut() {
                handle.on_tokens_changed();
            }
            pinged += span.len();
        }
        ReconcileMetrics::bump(&self.metrics.token_pings, pinged);
        trace!(
            target: "window.reconcile",
            ranges = ranges.len(),
            pinged,
            "tokens_changed"
        );
        pinged > 0
    }

    /// Whole buffer replaced: every cached handle is stale.
    pub fn on_flushed<H>(&self, window: &mut LineWindow<H>) -> Vec<H> {
        ReconcileMetrics::bump(&self.metrics.flushes, 1);
        let evicted = window.take_all();
        ReconcileMetrics::bump(&self.metrics.handles_evicted, evicted.len());
        debug!(target: "window.reconcile", evicted = evicted.len(), "flushed");
        evicted
    }

    /// Route one notification to the matching operation.
    pub fn apply<H, F>(
        &self,
        window: &mut LineWindow<H>,
        factory: &mut F,
        event: &ChangeEvent,
    ) -> ReconcileOutcome<H>
    where
        H: ContentInvalidatable,
        F: LineFactory<H> + ?Sized,
    {
        match event {
            ChangeEvent::LinesDeleted { from, to } => {
                ReconcileOutcome::Evicted(self.on_lines_deleted(window, *from, *to))
            }
            ChangeEvent::LinesInserted { from, to } => {
                ReconcileOutcome::Evicted(self.on_lines_inserted(window, factory, *from, *to))
            }
            ChangeEvent::LinesChanged { from, count } => {
                ReconcileOutcome::Pinged(self.on_lines_changed(window, *from, *count))
            }
            ChangeEvent::TokensChanged { ranges } => {
                ReconcileOutcome::Pinged(self.on_tokens_changed(window, ranges))
            }
            ChangeEvent::Flushed => ReconcileOutcome::Evicted(self.on_flushed(window)),
        }
    }
}
