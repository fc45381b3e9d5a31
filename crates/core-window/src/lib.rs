//! Rendered-line window: a bounded, contiguous cache of per-line render
//! handles kept in step with a text buffer through edit notifications.
//!
//! The host view layer owns one [`LineWindow`] per pane, fills it wholesale
//! with [`LineWindow::set`] on full renders, and funnels every buffer change
//! through a [`Reconciler`]. The reconciler renumbers, splices and evicts in
//! place and hands every removed handle back to the caller, who disposes of
//! it. Nothing here paints, tokenizes, or decides which lines should be
//! visible.
//!
//! Exposed Components:
//! - `window`: the `LineWindow<H>` container and its line-number addressed
//!   accessors (`line` panics outside the window; `get` does not).
//! - `handle`: the two capabilities the reconciler relies on,
//!   `ContentInvalidatable` (ping hooks) and `LineFactory` (fresh handles).
//! - `reconcile`: `Reconciler` with one operation per `ChangeEvent` kind plus
//!   `apply` for dispatch.
//! - `metrics`: per-reconciler counters with a plain snapshot for reporting.
//!
//! Invariants (hold after every public call):
//! - `len() == end_line_number() - start_line_number() + 1` when non-empty.
//! - `evicted ∪ final == before ∪ created`, with no handle on both sides.
//! - Edits that miss the window leave every handle in place.
//!
//! Threading: single writer. A window is mutated through `&mut`; the host
//! serializes notifications for it.

pub mod handle;
pub mod metrics;
pub mod reconcile;
pub mod window;

pub use handle::{ContentInvalidatable, LineFactory};
pub use metrics::{ReconcileMetrics, ReconcileMetricsSnapshot};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use window::LineWindow;

pub use core_events::{ChangeEvent, TokenRange};
