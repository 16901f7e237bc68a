use std::io::{self, Write};

use rayon::prelude::*;

use crate::line::{format_char_line, format_hex_line};
use crate::types::{FileRegion, FormattedLine, LineSpec, BYTES_PER_LINE};

/// Below this many lines the thread pool costs more than it saves.
const MIN_PARALLEL_LINES: usize = 4096;

/// Lines formatted and written per step of [`dump_region`]. Bounds memory
/// to one batch regardless of file size.
pub const BATCH_LINES: usize = 4 * MIN_PARALLEL_LINES;

/// Format every line overlapping `region`, in order.
///
/// Lines are aligned to `BYTES_PER_LINE` multiples of the region start, so
/// a dump that skips into the file keeps its requested first offset.
pub fn render_lines(data: &[u8], region: FileRegion, spec: &LineSpec) -> Vec<FormattedLine> {
    let region = region.clamp(data.len() as u64);
    if region.length == 0 {
        return Vec::new();
    }

    let start = region.offset as usize;
    let end = region.end() as usize;
    // Formatting past `end` must not leak bytes outside the region.
    let data = &data[..end];
    let lines = (end - start).div_ceil(BYTES_PER_LINE);

    let format = |i: usize| {
        let offset = start + i * BYTES_PER_LINE;
        FormattedLine {
            hex: format_hex_line(data, offset, spec),
            chars: format_char_line(data, offset, spec),
        }
    };

    if lines < MIN_PARALLEL_LINES {
        (0..lines).map(format).collect()
    } else {
        (0..lines).into_par_iter().map(format).collect()
    }
}

/// Write `hex  chars` rows.
pub fn write_dump<W: Write>(out: &mut W, lines: &[FormattedLine]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}  {}", line.hex, line.chars)?;
    }
    Ok(())
}

/// Format and write `region` in batches of [`BATCH_LINES`] lines.
///
/// Output is identical to rendering the whole region at once; only one
/// batch of formatted lines is held at a time. Returns the lines written.
pub fn dump_region<W: Write>(
    out: &mut W,
    data: &[u8],
    region: FileRegion,
    spec: &LineSpec,
) -> io::Result<usize> {
    let region = region.clamp(data.len() as u64);
    let batch_bytes = (BATCH_LINES * BYTES_PER_LINE) as u64;

    let mut written = 0;
    let mut offset = region.offset;
    while offset < region.end() {
        let length = batch_bytes.min(region.end() - offset);
        let lines = render_lines(data, FileRegion::new(offset, length), spec);
        write_dump(out, &lines)?;
        written += lines.len();
        offset += length;
    }
    Ok(written)
}
