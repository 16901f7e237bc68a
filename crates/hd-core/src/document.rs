//! Toolkit-neutral state behind a hex/character view.
//!
//! Owns the loaded bytes, the current [`LineSpec`], the visible-line window
//! and the per-line cache. A front end forwards its selector and scroll
//! events here and displays the returned text.

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cache::LineCache;
use crate::line::{format_line, line_count};
use crate::mapped_file::ByteBuffer;
use crate::scroll::VirtualWindow;
use crate::types::{ByteGrouping, Encoding, FormattedLine, LineSpec};

pub const ABOUT_TEXT: &str = "Hex Dump Utility\n\n\
    Shows file contents as a hexadecimal dump next to a decoded text column.\n\
    Supports 1, 2, 4, 8 and 16 byte grouping and ISO Latin-1, UTF-8, \
    UTF-16LE and GB 18030 encodings.";

#[derive(Debug, Default)]
pub struct HexDocument {
    buffer: ByteBuffer,
    name: Option<String>,
    spec: LineSpec,
    window: VirtualWindow,
    cache: LineCache,
}

impl HexDocument {
    pub fn new(spec: LineSpec, window: VirtualWindow) -> Self {
        Self {
            spec,
            window,
            ..Self::default()
        }
    }

    /// Load a file from disk.
    ///
    /// On failure the error is returned and the current content is left as is.
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        let buffer = ByteBuffer::open(path)?;
        log::info!("loaded {} ({} bytes)", path.display(), buffer.len());
        self.replace_buffer(path.display().to_string(), buffer);
        Ok(())
    }

    /// Load an in-memory buffer under a display name.
    pub fn load_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.replace_buffer(name.into(), ByteBuffer::from(bytes));
    }

    fn replace_buffer(&mut self, name: String, buffer: ByteBuffer) {
        self.buffer = buffer;
        self.name = Some(name);
        self.window.reset();
        self.window.set_total_lines(line_count(self.buffer.as_slice().len()));
        self.cache.invalidate();
    }

    pub fn has_file(&self) -> bool {
        self.name.is_some()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.name.as_ref().map(PathBuf::from)
    }

    pub fn bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn spec(&self) -> LineSpec {
        self.spec
    }

    pub fn window(&self) -> &VirtualWindow {
        &self.window
    }

    pub fn total_lines(&self) -> usize {
        self.window.total_lines()
    }

    pub fn cached_lines(&self) -> usize {
        self.cache.len()
    }

    pub fn set_spec(&mut self, spec: LineSpec) {
        if spec != self.spec {
            self.spec = spec;
            self.cache.invalidate();
        }
    }

    pub fn set_grouping(&mut self, grouping: ByteGrouping) {
        self.set_spec(LineSpec { grouping, ..self.spec });
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.set_spec(LineSpec { encoding, ..self.spec });
    }

    /// Forward a pixel scroll offset. Returns true if the visible text changed.
    pub fn on_scroll(&mut self, y: f32) -> bool {
        self.window.update_for_scroll(y)
    }

    /// Formatted line at `index`, from the cache when possible.
    pub fn line(&mut self, index: usize) -> &FormattedLine {
        let data = self.buffer.as_slice();
        let spec = self.spec;
        self.cache.get_or_insert_with(index, || format_line(data, index, &spec))
    }

    fn render(&mut self, range: Range<usize>, column: fn(&FormattedLine) -> &str) -> String {
        let mut out = String::new();
        for index in range {
            out.push_str(column(self.line(index)));
            out.push('\n');
        }
        out
    }

    /// Hex column of the visible window, one line per row.
    pub fn visible_hex_text(&mut self) -> String {
        let range = self.window.visible_range();
        self.render(range, |l| l.hex.as_str())
    }

    /// Character column of the visible window.
    pub fn visible_char_text(&mut self) -> String {
        let range = self.window.visible_range();
        self.render(range, |l| l.chars.as_str())
    }

    /// Hex column of the whole document. Bypasses the cache.
    pub fn full_hex_text(&self) -> String {
        self.full_text(|l| l.hex)
    }

    /// Character column of the whole document. Bypasses the cache.
    pub fn full_char_text(&self) -> String {
        self.full_text(|l| l.chars)
    }

    fn full_text(&self, column: fn(FormattedLine) -> String) -> String {
        let data = self.buffer.as_slice();
        let mut out = String::new();
        for index in 0..line_count(data.len()) {
            out.push_str(&column(format_line(data, index, &self.spec)));
            out.push('\n');
        }
        out
    }

    /// Status bar text.
    pub fn status_text(&self) -> String {
        match &self.name {
            Some(name) => format!("File: {} | Size: {} bytes", name, self.buffer.len()),
            None => "Ready".to_string(),
        }
    }

    pub fn about_text(&self) -> &'static str {
        ABOUT_TEXT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::hex_line_width;
    use std::io::Write;

    fn doc_with(len: usize) -> HexDocument {
        let mut doc = HexDocument::default();
        doc.load_bytes("test.bin", (0..len).map(|i| (i % 256) as u8).collect());
        doc
    }

    #[test]
    fn empty_document_is_ready() {
        let mut doc = HexDocument::default();
        assert!(!doc.has_file());
        assert_eq!(doc.status_text(), "Ready");
        assert_eq!(doc.visible_hex_text(), "");
        assert_eq!(doc.visible_char_text(), "");
    }

    #[test]
    fn status_shows_name_and_size() {
        let doc = doc_with(100);
        assert_eq!(doc.status_text(), "File: test.bin | Size: 100 bytes");
        assert_eq!(doc.total_lines(), 7);
    }

    #[test]
    fn visible_text_covers_window_only() {
        let mut doc = doc_with(16 * 100);
        let hex = doc.visible_hex_text();
        assert_eq!(hex.lines().count(), 30);
        assert!(hex.starts_with("00000000: 00 01 "));
        assert_eq!(doc.cached_lines(), 30);

        assert!(doc.on_scroll(50.0 * 20.0));
        let hex = doc.visible_hex_text();
        assert!(hex.starts_with("00000320: "));
        assert_eq!(doc.cached_lines(), 60);
    }

    #[test]
    fn char_text_matches_hex_rows() {
        let mut doc = HexDocument::default();
        doc.load_bytes("hello", b"Hello, world! This is two lines.".to_vec());
        assert_eq!(doc.visible_char_text(), "Hello, world! Th\nis is two lines.\n");
        assert_eq!(doc.visible_hex_text().lines().count(), 2);
    }

    #[test]
    fn changing_spec_invalidates_cache() {
        let mut doc = doc_with(64);
        doc.visible_hex_text();
        assert_eq!(doc.cached_lines(), 4);

        doc.set_grouping(ByteGrouping::Four);
        assert_eq!(doc.cached_lines(), 0);
        let hex = doc.visible_hex_text();
        assert!(hex.starts_with("00000000: 00010203 "));

        doc.set_encoding(Encoding::Utf8);
        assert_eq!(doc.cached_lines(), 0);
        assert_eq!(doc.spec(), LineSpec::new(ByteGrouping::Four, Encoding::Utf8));
    }

    #[test]
    fn same_spec_keeps_cache() {
        let mut doc = doc_with(64);
        doc.visible_hex_text();
        doc.set_grouping(ByteGrouping::One);
        assert_eq!(doc.cached_lines(), 4);
    }

    #[test]
    fn full_text_includes_partial_last_line() {
        let doc = doc_with(20);
        let hex = doc.full_hex_text();
        let lines: Vec<&str> = hex.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].len(), hex_line_width(ByteGrouping::One));
        assert!(lines[1].starts_with("00000010: 10 11 12 13 "));
        assert_eq!(doc.full_char_text().lines().count(), 2);
    }

    #[test]
    fn load_path_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"ABC").unwrap();
        f.flush().unwrap();

        let mut doc = HexDocument::default();
        doc.load_path(f.path()).unwrap();
        assert_eq!(doc.bytes(), b"ABC");
        assert_eq!(doc.visible_char_text(), "ABC\n");
        assert_eq!(doc.file_path().as_deref(), Some(f.path()));
    }

    #[test]
    fn failed_load_keeps_previous_content() {
        let mut doc = doc_with(32);
        let before = doc.full_hex_text();

        let dir = tempfile::tempdir().unwrap();
        assert!(doc.load_path(&dir.path().join("missing")).is_err());

        assert_eq!(doc.full_hex_text(), before);
        assert_eq!(doc.file_name(), Some("test.bin"));
    }

    #[test]
    fn loading_resets_scroll() {
        let mut doc = doc_with(16 * 1000);
        doc.on_scroll(500.0 * 20.0);
        assert_eq!(doc.window().top_line(), 500);

        doc.load_bytes("small", vec![0; 16]);
        assert_eq!(doc.window().top_line(), 0);
        assert_eq!(doc.cached_lines(), 0);
    }

    #[test]
    fn about_mentions_encodings() {
        assert!(HexDocument::default().about_text().contains("GB 18030"));
    }
}
