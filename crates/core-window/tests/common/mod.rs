#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_window::{ContentInvalidatable, LineFactory, LineWindow};

/// Handle that records how often each hook fired. `id` stands in for
/// object identity: fixture lines use their original line number, factory
/// lines count up from `FRESH_BASE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestLine {
    pub id: usize,
    pub content_pings: u32,
    pub token_pings: u32,
}

impl TestLine {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            content_pings: 0,
            token_pings: 0,
        }
    }
}

impl ContentInvalidatable for TestLine {
    fn on_content_changed(&mut self) {
        self.content_pings += 1;
    }

    fn on_tokens_changed(&mut self) {
        self.token_pings += 1;
    }
}

pub const FRESH_BASE: usize = 1000;

#[derive(Debug)]
pub struct TestFactory {
    pub created: usize,
}

impl TestFactory {
    pub fn new() -> Self {
        Self { created: 0 }
    }
}

impl LineFactory<TestLine> for TestFactory {
    fn create(&mut self) -> TestLine {
        self.created += 1;
        TestLine::new(FRESH_BASE + self.created)
    }
}

/// Window `[L6, L7, L8, L9]` starting at line 6.
pub fn fixture() -> LineWindow<TestLine> {
    window_at(6, 4)
}

pub fn window_at(start: usize, len: usize) -> LineWindow<TestLine> {
    LineWindow::with_lines(start, (start..start + len).map(TestLine::new).collect())
}

pub fn ids(lines: &[TestLine]) -> Vec<usize> {
    lines.iter().map(|l| l.id).collect()
}

pub fn window_ids(w: &LineWindow<TestLine>) -> Vec<usize> {
    ids(w.lines())
}

pub fn is_fresh(line: &TestLine) -> bool {
    line.id > FRESH_BASE
}
