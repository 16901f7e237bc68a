//! View defaults loaded from a JSON settings file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::scroll::{VirtualWindow, DEFAULT_LINE_HEIGHT, DEFAULT_VISIBLE_LINES};
use crate::types::{ByteGrouping, Encoding, LineSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grouping: ByteGrouping,
    pub encoding: Encoding,
    /// Rows materialised per virtual window.
    pub visible_lines: usize,
    /// Estimated row height in pixels, used to map scroll offsets to lines.
    pub line_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grouping: ByteGrouping::default(),
            encoding: Encoding::default(),
            visible_lines: DEFAULT_VISIBLE_LINES,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn line_spec(&self) -> LineSpec {
        LineSpec::new(self.grouping, self.encoding)
    }

    pub fn window(&self) -> VirtualWindow {
        VirtualWindow::new(self.visible_lines, self.line_height)
    }
}
