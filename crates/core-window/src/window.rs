//! Contiguous, line-number-addressed window of cached render handles.
//!
//! `lines[i]` always belongs to model line `start_line_number + i`. Line
//! numbers are 1-based and inclusive. Renumbering after edits above the
//! window is done by moving `start_line_number`; handles themselves never
//! learn their line number.
//!
//! Invariants:
//! * `start_line_number >= 1`, also while `lines` is empty (it records where
//!   the next handle would belong).
//! * `end_line_number() == start_line_number + len() - 1` whenever non-empty.
//! * Handles leave the window only by being moved out to the caller.

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWindow<H> {
    start_line_number: usize,
    lines: Vec<H>,
}

impl<H> Default for LineWindow<H> {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<H> LineWindow<H> {
    /// Empty window anchored at `start_line_number`.
    pub fn new(start_line_number: usize) -> Self {
        debug_assert!(start_line_number >= 1, "line numbers are 1-based");
        Self {
            start_line_number,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(start_line_number: usize, lines: Vec<H>) -> Self {
        debug_assert!(start_line_number >= 1, "line numbers are 1-based");
        Self {
            start_line_number,
            lines,
        }
    }

    pub fn start_line_number(&self) -> usize {
        self.start_line_number
    }

    /// Last cached line number. Meaningless when the window is empty
    /// (yields `start_line_number - 1`); check `is_empty` before iterating.
    pub fn end_line_number(&self) -> usize {
        (self.start_line_number - 1).saturating_add(self.lines.len())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, line_number: usize) -> bool {
        self.index_of(line_number).is_some()
    }

    fn index_of(&self, line_number: usize) -> Option<usize> {
        let idx = line_number.checked_sub(self.start_line_number)?;
        (idx < self.lines.len()).then_some(idx)
    }

    /// Handle cached for `line_number`.
    ///
    /// # Panics
    /// When `line_number` lies outside `[start, end]`. Asking for an uncached
    /// line is a caller bug and must not be papered over.
    pub fn line(&self, line_number: usize) -> &H {
        match self.index_of(line_number) {
            Some(idx) => &self.lines[idx],
            None => panic!(
                "line {line_number} outside window {}..={}",
                self.start_line_number,
                self.end_line_number()
            ),
        }
    }

    /// Mutable counterpart of [`LineWindow::line`]; panics under the same condition.
    pub fn line_mut(&mut self, line_number: usize) -> &mut H {
        match self.index_of(line_number) {
            Some(idx) => &mut self.lines[idx],
            None => panic!(
                "line {line_number} outside window {}..={}",
                self.start_line_number,
                self.end_line_number()
            ),
        }
    }

    /// Non-panicking lookup.
    pub fn get(&self, line_number: usize) -> Option<&H> {
        self.index_of(line_number).map(|idx| &self.lines[idx])
    }

    pub fn get_mut(&mut self, line_number: usize) -> Option<&mut H> {
        self.index_of(line_number).map(|idx| &mut self.lines[idx])
    }

    /// Handles in ascending line order.
    pub fn lines(&self) -> &[H] {
        &self.lines
    }

    /// `(line_number, handle)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &H)> + '_ {
        let start = self.start_line_number;
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, h)| (start.saturating_add(i), h))
    }

    /// Handles whose line numbers fall in `from..=to`, clipped to the window.
    /// Empty when the range misses the window entirely.
    pub fn span(&self, from: usize, to: usize) -> &[H] {
        match self.clip(from, to) {
            Some((lo, hi)) => &self.lines[lo..=hi],
            None => &[],
        }
    }

    pub fn span_mut(&mut self, from: usize, to: usize) -> &mut [H] {
        match self.clip(from, to) {
            Some((lo, hi)) => &mut self.lines[lo..=hi],
            None => &mut [],
        }
    }

    /// Intersect the inclusive line range with the window; returns vector indices.
    fn clip(&self, from: usize, to: usize) -> Option<(usize, usize)> {
        if self.lines.is_empty() || from > to {
            return None;
        }
        let lo = from.max(self.start_line_number);
        let hi = to.min(self.end_line_number());
        if lo > hi {
            return None;
        }
        Some((lo - self.start_line_number, hi - self.start_line_number))
    }

    /// Replace the window wholesale (full re-render). Previous handles are
    /// returned untouched so the caller can dispose of them.
    pub fn set(&mut self, start_line_number: usize, lines: Vec<H>) -> Vec<H> {
        debug_assert!(start_line_number >= 1, "line numbers are 1-based");
        trace!(
            target: "window.set",
            old_start = self.start_line_number,
            old_len = self.lines.len(),
            new_start = start_line_number,
            new_len = lines.len(),
            "window_set"
        );
        self.start_line_number = start_line_number;
        std::mem::replace(&mut self.lines, lines)
    }

    /// Remove every handle, keeping `start_line_number`.
    pub fn take_all(&mut self) -> Vec<H> {
        std::mem::take(&mut self.lines)
    }

    pub(crate) fn set_start_line_number(&mut self, start_line_number: usize) {
        debug_assert!(start_line_number >= 1, "line numbers are 1-based");
        self.start_line_number = start_line_number;
    }

    pub(crate) fn lines_mut(&mut self) -> &mut Vec<H> {
        &mut self.lines
    }
}
