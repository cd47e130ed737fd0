//! Indentation stack
//!
//!     Records the distinct indentation widths open on the current nesting path, outer to
//!     inner. The root width 0 is always present and never popped, so the entries form a
//!     strictly increasing sequence and each emitted outdent corresponds to one pop.

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentStack {
    levels: Vec<usize>,
}

impl IndentStack {
    pub fn new() -> Self {
        Self { levels: vec![0] }
    }

    /// Width of the innermost open level.
    pub fn current(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    /// Opens a deeper level. Widths not deeper than the current one are ignored.
    pub fn push(&mut self, width: usize) {
        if width > self.current() {
            trace!(width, depth = self.levels.len(), "indent level opened");
            self.levels.push(width);
        }
    }

    /// Closes the innermost level, if any besides the root.
    pub fn pop(&mut self) -> Option<usize> {
        if self.levels.len() > 1 {
            self.levels.pop()
        } else {
            None
        }
    }

    /// Closes levels until `width` is the innermost one and returns how many were closed.
    ///
    /// Returns `None`, leaving the stack untouched, when `width` was never opened on the
    /// current path.
    pub fn dedent_to(&mut self, width: usize) -> Option<usize> {
        let target = self.levels.iter().position(|&level| level == width)?;
        let closed = self.levels.len() - 1 - target;
        self.levels.truncate(target + 1);
        trace!(width, closed, "indent levels closed");
        Some(closed)
    }
}

impl Default for IndentStack {
    fn default() -> Self {
        Self::new()
    }
}
