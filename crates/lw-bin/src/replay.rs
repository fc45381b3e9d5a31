//! Script replay: drive a window of demo handles through a change script and
//! report every step.

use anyhow::Result;
use core_events::ChangeEvent;
use core_window::{
    ContentInvalidatable, LineWindow, ReconcileMetricsSnapshot, ReconcileOutcome, Reconciler,
};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use tracing::{debug, trace};

/// Stand-in render row. Lines present at startup are labelled `L<n>` after
/// their initial line number; factory-made lines are `N<k>` in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoLine {
    pub label: String,
    pub content: u32,
    pub tokens: u32,
}

impl DemoLine {
    fn new(label: String) -> Self {
        Self {
            label,
            content: 0,
            tokens: 0,
        }
    }

    pub fn original(line_number: usize) -> Self {
        Self::new(format!("L{line_number}"))
    }

    pub fn fresh(seq: usize) -> Self {
        Self::new(format!("N{seq}"))
    }
}

impl ContentInvalidatable for DemoLine {
    fn on_content_changed(&mut self) {
        self.content += 1;
    }

    fn on_tokens_changed(&mut self) {
        self.tokens += 1;
    }
}

impl fmt::Display for DemoLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)?;
        match (self.content, self.tokens) {
            (0, 0) => Ok(()),
            (c, 0) => write!(f, "(c{c})"),
            (0, t) => write!(f, "(t{t})"),
            (c, t) => write!(f, "(c{c},t{t})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySettings {
    pub start_line: usize,
    pub capacity: usize,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StepReport {
    step: usize,
    event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    evicted: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pinged: Option<bool>,
    start: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<usize>,
    lines: Vec<DemoLine>,
}

impl StepReport {
    fn new(
        step: usize,
        event: &ChangeEvent,
        outcome: &ReconcileOutcome<DemoLine>,
        window: &LineWindow<DemoLine>,
    ) -> Self {
        let (evicted, pinged) = match outcome {
            ReconcileOutcome::Evicted(v) => {
                (Some(v.iter().map(|l| l.label.clone()).collect()), None)
            }
            ReconcileOutcome::Pinged(p) => (None, Some(*p)),
        };
        Self {
            step,
            event: event.to_string(),
            evicted,
            pinged,
            start: window.start_line_number(),
            end: (!window.is_empty()).then(|| window.end_line_number()),
            lines: window.lines().to_vec(),
        }
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: ", self.step, self.event)?;
        if let Some(evicted) = &self.evicted {
            write!(f, "evicted [{}]", evicted.join(" "))?;
        }
        if let Some(pinged) = self.pinged {
            write!(f, "pinged {pinged}")?;
        }
        match self.end {
            Some(end) => {
                let lines: Vec<String> = self.lines.iter().map(ToString::to_string).collect();
                write!(f, "; window {}..={} [{}]", self.start, end, lines.join(" "))
            }
            None => write!(f, "; window empty at {}", self.start),
        }
    }
}

#[derive(Serialize)]
struct Summary {
    metrics: ReconcileMetricsSnapshot,
}

fn format_metrics(m: &ReconcileMetricsSnapshot) -> String {
    format!(
        "metrics: deletes={} inserts={} content_changes={} token_changes={} flushes={} shifts={} created={} evicted={} content_pings={} token_pings={}",
        m.deletes,
        m.inserts,
        m.content_changes,
        m.token_changes,
        m.flushes,
        m.shifts,
        m.handles_created,
        m.handles_evicted,
        m.content_pings,
        m.token_pings
    )
}

/// Replay `events` against a freshly filled window, writing one report line
/// per event followed by the metrics summary.
pub fn run<W: Write>(
    settings: &ReplaySettings,
    events: &[ChangeEvent],
    out: &mut W,
) -> Result<ReconcileMetricsSnapshot> {
    let reconciler = Reconciler::new();
    let start = settings.start_line;
    let mut window = LineWindow::new(start);
    window.set(
        start,
        (start..start.saturating_add(settings.capacity))
            .map(DemoLine::original)
            .collect(),
    );

    let mut created = 0usize;
    let mut factory = || {
        created += 1;
        DemoLine::fresh(created)
    };

    for (idx, event) in events.iter().enumerate() {
        let step = idx + 1;
        let span =
            tracing::debug_span!(target: "runtime.replay", "event", step, kind = event.kind());
        let _enter = span.enter();

        let outcome = reconciler.apply(&mut window, &mut factory, event);
        let report = StepReport::new(step, event, &outcome, &window);
        for disposed in outcome.into_evicted() {
            trace!(target: "runtime.replay", label = disposed.label.as_str(), "dispose");
        }
        debug!(
            target: "runtime.replay",
            start = report.start,
            len = report.lines.len(),
            "step_applied"
        );

        if settings.json {
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{report}")?;
        }
    }

    let metrics = reconciler.metrics().snapshot();
    if settings.json {
        serde_json::to_writer(&mut *out, &Summary { metrics })?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", format_metrics(&metrics))?;
    }
    Ok(metrics)
}
