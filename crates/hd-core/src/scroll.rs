//! Scroll bookkeeping for two mirrored panes and the visible-line window.

use std::cell::Cell;
use std::ops::Range;

/// Lines shown at once when nothing else is configured.
pub const DEFAULT_VISIBLE_LINES: usize = 30;
/// Estimated height of one text row in pixels.
pub const DEFAULT_LINE_HEIGHT: f32 = 20.0;
/// The window only moves when the top line shifts by more than this.
pub const REFRESH_THRESHOLD: usize = 5;

/// One of the two mirrored views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Hex,
    Chars,
}

impl Pane {
    pub fn other(self) -> Pane {
        match self {
            Pane::Hex => Pane::Chars,
            Pane::Chars => Pane::Hex,
        }
    }
}

/// Keeps the hex and character panes at the same vertical offset.
///
/// Scroll callbacks from a toolkit fire again when the mirrored pane is
/// moved programmatically; while a propagation is in flight any such
/// echo is ignored.
#[derive(Debug, Default)]
pub struct ScrollSync {
    syncing: Cell<bool>,
    offset: Cell<f32>,
}

/// Clears the echo flag when dropped.
struct EchoGuard<'a>(&'a Cell<bool>);

impl Drop for EchoGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last propagated offset.
    pub fn offset(&self) -> f32 {
        self.offset.get()
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.get()
    }

    /// Handle a scroll of `source` to `y`, moving the other pane via `mirror`.
    ///
    /// Returns false when the call is an echo of a propagation already in
    /// progress. `mirror` may re-enter this method.
    pub fn on_scrolled<F>(&self, source: Pane, y: f32, mirror: F) -> bool
    where
        F: FnOnce(Pane, f32),
    {
        if self.syncing.replace(true) {
            return false;
        }
        let _guard = EchoGuard(&self.syncing);

        self.offset.set(y);
        mirror(source.other(), y);
        true
    }
}

/// The slice of lines currently materialised for display.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualWindow {
    pub visible_lines: usize,
    pub line_height: f32,
    top_line: usize,
    total_lines: usize,
}

impl Default for VirtualWindow {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBLE_LINES, DEFAULT_LINE_HEIGHT)
    }
}

impl VirtualWindow {
    pub fn new(visible_lines: usize, line_height: f32) -> Self {
        let line_height = if line_height > 0.0 { line_height } else { DEFAULT_LINE_HEIGHT };
        Self {
            visible_lines,
            line_height,
            top_line: 0,
            total_lines: 0,
        }
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Set the document length in lines, keeping the top line in range.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.top_line = self.top_line.min(total.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.top_line = 0;
    }

    /// Move the window for a pixel scroll offset.
    ///
    /// Returns true when the top line moved and the visible text must be
    /// rebuilt.
    pub fn update_for_scroll(&mut self, y: f32) -> bool {
        if self.total_lines == 0 {
            return false;
        }

        // Negative and NaN offsets saturate to 0 in the cast.
        let target = ((y / self.line_height).floor() as usize).min(self.total_lines - 1);

        if target.abs_diff(self.top_line) > REFRESH_THRESHOLD {
            log::debug!("virtual window top {} -> {}", self.top_line, target);
            self.top_line = target;
            true
        } else {
            false
        }
    }

    /// Line indices to render.
    pub fn visible_range(&self) -> Range<usize> {
        let end = self
            .top_line
            .saturating_add(self.visible_lines)
            .min(self.total_lines);
        self.top_line.min(end)..end
    }
}
