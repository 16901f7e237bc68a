use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Bytes rendered on every dump line.
pub const BYTES_PER_LINE: usize = 16;

/// A byte range within a buffer, defined by offset and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRegion {
    pub offset: u64,
    pub length: u64,
}

impl FileRegion {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Returns the exclusive end offset of this region.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    /// Clamp this region to `[0, len)`.
    pub fn clamp(&self, len: u64) -> FileRegion {
        let start = self.offset.min(len);
        let end = self.end().min(len);
        FileRegion::new(start, end - start)
    }
}

/// Number of bytes concatenated without a separator in the hex column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ByteGrouping {
    #[default]
    #[serde(rename = "1", alias = "1 byte")]
    One,
    #[serde(rename = "2", alias = "2 bytes")]
    Two,
    #[serde(rename = "4", alias = "4 bytes")]
    Four,
    #[serde(rename = "8", alias = "8 bytes")]
    Eight,
    #[serde(rename = "16", alias = "16 bytes")]
    Sixteen,
}

impl ByteGrouping {
    pub fn bytes(&self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    pub fn from_bytes(n: usize) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }

    /// Selector label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::One => "1 byte",
            Self::Two => "2 bytes",
            Self::Four => "4 bytes",
            Self::Eight => "8 bytes",
            Self::Sixteen => "16 bytes",
        }
    }

    pub fn all() -> &'static [ByteGrouping] {
        &[Self::One, Self::Two, Self::Four, Self::Eight, Self::Sixteen]
    }
}

impl fmt::Display for ByteGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ByteGrouping {
    type Err = ParseSpecError;

    /// Accepts a selector label ("4 bytes") or a bare count ("4").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(g) = Self::all().iter().find(|g| g.label().eq_ignore_ascii_case(trimmed)) {
            return Ok(*g);
        }
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(Self::from_bytes)
            .ok_or_else(|| ParseSpecError::UnknownGrouping(s.to_string()))
    }
}

/// Text encoding used for the character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    #[serde(alias = "ISO Latin-1")]
    Latin1,
    #[serde(alias = "UTF-8")]
    Utf8,
    #[serde(alias = "UTF-16LE")]
    Utf16Le,
    #[serde(alias = "GB 18030")]
    Gb18030,
}

impl Encoding {
    /// Selector label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Latin1 => "ISO Latin-1",
            Self::Utf8 => "UTF-8",
            Self::Utf16Le => "UTF-16LE",
            Self::Gb18030 => "GB 18030",
        }
    }

    pub fn all() -> &'static [Encoding] {
        &[Self::Latin1, Self::Utf8, Self::Utf16Le, Self::Gb18030]
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = ParseSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Compare with punctuation and spacing stripped: "UTF-16LE" == "utf16le".
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "latin1" | "isolatin1" | "iso88591" => Ok(Self::Latin1),
            "utf8" => Ok(Self::Utf8),
            "utf16le" | "utf16" => Ok(Self::Utf16Le),
            "gb18030" => Ok(Self::Gb18030),
            _ => Err(ParseSpecError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Formatting configuration shared by both columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineSpec {
    #[serde(default)]
    pub grouping: ByteGrouping,
    #[serde(default)]
    pub encoding: Encoding,
}

impl LineSpec {
    pub fn new(grouping: ByteGrouping, encoding: Encoding) -> Self {
        Self { grouping, encoding }
    }

    pub fn bytes_per_line(&self) -> usize {
        BYTES_PER_LINE
    }

    pub fn bytes_per_group(&self) -> usize {
        self.grouping.bytes()
    }
}

/// One rendered dump line: hex column and decoded-character column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedLine {
    pub hex: String,
    pub chars: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseSpecError {
    UnknownGrouping(String),
    UnknownEncoding(String),
}

impl fmt::Display for ParseSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseSpecError::UnknownGrouping(s) => {
                write!(f, "unknown byte grouping {:?} (expected 1, 2, 4, 8 or 16)", s)
            }
            ParseSpecError::UnknownEncoding(s) => {
                write!(f, "unknown encoding {:?} (expected latin1, utf8, utf16le or gb18030)", s)
            }
        }
    }
}

impl std::error::Error for ParseSpecError {}

#[cfg(test)]
mod tests {
    use super::*;

    // --- FileRegion tests ---

    #[test]
    fn file_region_end_saturates() {
        let r = FileRegion::new(u64::MAX - 5, 10);
        assert_eq!(r.end(), u64::MAX);
    }

    #[test]
    fn file_region_clamp_past_end() {
        let r = FileRegion::new(90, 20).clamp(100);
        assert_eq!(r, FileRegion::new(90, 10));
    }

    #[test]
    fn file_region_clamp_fully_outside() {
        let r = FileRegion::new(200, 20).clamp(100);
        assert_eq!(r, FileRegion::new(100, 0));
    }

    // --- ByteGrouping tests ---

    #[test]
    fn grouping_parses_counts_and_labels() {
        assert_eq!("4".parse::<ByteGrouping>(), Ok(ByteGrouping::Four));
        assert_eq!("16 bytes".parse::<ByteGrouping>(), Ok(ByteGrouping::Sixteen));
        assert_eq!("1 Byte".parse::<ByteGrouping>(), Ok(ByteGrouping::One));
    }

    #[test]
    fn grouping_rejects_unsupported_width() {
        assert_eq!(
            "3".parse::<ByteGrouping>(),
            Err(ParseSpecError::UnknownGrouping("3".into()))
        );
    }

    #[test]
    fn grouping_bytes_round_trip() {
        for g in ByteGrouping::all() {
            assert_eq!(ByteGrouping::from_bytes(g.bytes()), Some(*g));
        }
    }

    // --- Encoding tests ---

    #[test]
    fn encoding_parses_labels_and_aliases() {
        assert_eq!("ISO Latin-1".parse::<Encoding>(), Ok(Encoding::Latin1));
        assert_eq!("utf8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert_eq!("UTF-16LE".parse::<Encoding>(), Ok(Encoding::Utf16Le));
        assert_eq!("GB 18030".parse::<Encoding>(), Ok(Encoding::Gb18030));
    }

    #[test]
    fn encoding_parse_error_mentions_input() {
        let err = "ebcdic".parse::<Encoding>().unwrap_err();
        assert!(err.to_string().contains("ebcdic"));
    }

    #[test]
    fn line_spec_defaults() {
        let spec = LineSpec::default();
        assert_eq!(spec.bytes_per_line(), 16);
        assert_eq!(spec.bytes_per_group(), 1);
        assert_eq!(spec.encoding, Encoding::Latin1);
    }

    #[test]
    fn line_spec_serde_accepts_labels() {
        let spec: LineSpec =
            serde_json::from_str(r#"{"grouping": "4 bytes", "encoding": "UTF-8"}"#).unwrap();
        assert_eq!(spec, LineSpec::new(ByteGrouping::Four, Encoding::Utf8));

        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"grouping":"4","encoding":"utf8"}"#);
    }
}
