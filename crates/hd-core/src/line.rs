//! Fixed-width formatting of one dump line.

use std::fmt::Write;

use crate::encoding;
use crate::types::{ByteGrouping, FormattedLine, LineSpec, BYTES_PER_LINE};

/// Width of the `AAAAAAAA: ` address prefix.
pub const ADDRESS_WIDTH: usize = 10;

/// Number of lines needed to show `len` bytes.
pub fn line_count(len: usize) -> usize {
    len.div_ceil(BYTES_PER_LINE)
}

/// Character width of every hex line for `grouping`, address included.
pub fn hex_line_width(grouping: ByteGrouping) -> usize {
    let groups = BYTES_PER_LINE.div_ceil(grouping.bytes());
    ADDRESS_WIDTH + BYTES_PER_LINE * 2 + groups - 1
}

/// Bytes shown on the line starting at `offset`; empty past the end.
fn line_bytes(data: &[u8], offset: usize) -> &[u8] {
    if offset >= data.len() {
        return &[];
    }
    let end = offset.saturating_add(BYTES_PER_LINE).min(data.len());
    &data[offset..end]
}

/// Format the hex column for the line starting at `offset`.
///
/// Short lines are padded with two spaces per missing byte and one per
/// missing group separator, so every line has [`hex_line_width`] columns.
pub fn format_hex_line(data: &[u8], offset: usize, spec: &LineSpec) -> String {
    let group = spec.bytes_per_group();
    let bytes = line_bytes(data, offset);

    let mut line = String::with_capacity(hex_line_width(spec.grouping));
    let _ = write!(line, "{:08X}: ", offset);

    for (i, chunk) in bytes.chunks(group).enumerate() {
        if i > 0 {
            line.push(' ');
        }
        for b in chunk {
            let _ = write!(line, "{:02X}", b);
        }
    }

    if bytes.len() < BYTES_PER_LINE {
        let total_groups = BYTES_PER_LINE.div_ceil(group);
        let groups_on_line = bytes.len().div_ceil(group);
        let missing_separators =
            total_groups.saturating_sub(1) - groups_on_line.saturating_sub(1);
        let padding = (BYTES_PER_LINE - bytes.len()) * 2 + missing_separators;
        line.extend(std::iter::repeat(' ').take(padding));
    }

    line
}

/// Decode the line starting at `offset` for the character column.
pub fn format_char_line(data: &[u8], offset: usize, spec: &LineSpec) -> String {
    encoding::decode(line_bytes(data, offset), spec.encoding)
}

/// Both columns for line number `index`.
pub fn format_line(data: &[u8], index: usize, spec: &LineSpec) -> FormattedLine {
    let offset = index.saturating_mul(BYTES_PER_LINE);
    FormattedLine {
        hex: format_hex_line(data, offset, spec),
        chars: format_char_line(data, offset, spec),
    }
}
