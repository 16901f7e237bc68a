use std::collections::HashMap;

use crate::types::FormattedLine;

/// Formatted lines memoized by line index.
///
/// Entries are only valid for the buffer and `LineSpec` they were built
/// from; callers must `invalidate` when either changes.
#[derive(Debug, Default)]
pub struct LineCache {
    lines: HashMap<usize, FormattedLine>,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&FormattedLine> {
        self.lines.get(&index)
    }

    /// Return the cached line, computing and storing it on a miss.
    pub fn get_or_insert_with<F>(&mut self, index: usize, compute: F) -> &FormattedLine
    where
        F: FnOnce() -> FormattedLine,
    {
        self.lines.entry(index).or_insert_with(compute)
    }

    /// Drop every entry.
    pub fn invalidate(&mut self) {
        if !self.lines.is_empty() {
            log::debug!("invalidating {} cached lines", self.lines.len());
        }
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
