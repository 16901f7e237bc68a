//! Byte-slice to display-string decoders for the character column.
//!
//! Every decoder is total: bytes that cannot be shown become `.`, so the
//! column never fails to render.

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::types::Encoding;

/// Placeholder for undecodable or non-printable input.
pub const PLACEHOLDER: char = '.';

/// Decode `data` for display under `encoding`.
pub fn decode(data: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Latin1 => decode_latin1(data),
        Encoding::Utf8 => decode_utf8(data),
        Encoding::Utf16Le => decode_utf16le(data),
        Encoding::Gb18030 => decode_gb18030(data),
    }
}

/// True for letters, marks, numbers, punctuation, symbols and U+0020.
pub fn is_printable(c: char) -> bool {
    use GeneralCategory::*;

    if c == ' ' {
        return true;
    }
    matches!(
        get_general_category(c),
        UppercaseLetter
            | LowercaseLetter
            | TitlecaseLetter
            | ModifierLetter
            | OtherLetter
            | NonspacingMark
            | SpacingMark
            | EnclosingMark
            | DecimalNumber
            | LetterNumber
            | OtherNumber
            | ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
    )
}

fn printable_or_placeholder(c: char) -> char {
    if is_printable(c) {
        c
    } else {
        PLACEHOLDER
    }
}

/// ISO-8859-1: ASCII graphics and space, plus 0xA0..=0xFF as their own code points.
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter()
        .map(|&b| match b {
            0x20..=0x7E | 0xA0..=0xFF => char::from(b),
            _ => PLACEHOLDER,
        })
        .collect()
}

/// Greedy UTF-8: one `.` per byte of an invalid sequence.
pub fn decode_utf8(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        out.extend(chunk.valid().chars().map(printable_or_placeholder));
        // The invalid part is at most one maximal prefix; each of its bytes
        // fails on its own when decoding restarts one byte later.
        out.extend(std::iter::repeat(PLACEHOLDER).take(chunk.invalid().len()));
    }
    out
}

/// UTF-16LE, one code unit at a time. Surrogates are never paired, so a lone
/// surrogate unit shows as U+FFFD.
pub fn decode_utf16le(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() / 2 + 1);
    let mut units = data.chunks_exact(2);
    for pair in &mut units {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        let c = char::decode_utf16([unit])
            .next()
            .and_then(Result::ok)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        out.push(printable_or_placeholder(c));
    }
    if !units.remainder().is_empty() {
        out.push(PLACEHOLDER);
    }
    out
}

/// GB 18030 decoded in one pass; any malformed input yields one `.` per byte.
pub fn decode_gb18030(data: &[u8]) -> String {
    match encoding_rs::GB18030.decode_without_bom_handling_and_without_replacement(data) {
        Some(text) => text.chars().map(printable_or_placeholder).collect(),
        None => std::iter::repeat(PLACEHOLDER).take(data.len()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_printable_ascii() {
        assert_eq!(decode_latin1(b"Hello"), "Hello");
    }

    #[test]
    fn latin1_controls_and_c1_are_dots() {
        assert_eq!(decode_latin1(&[0x00, 0x1F, 0x7F, 0x80, 0x9F]), ".....");
    }

    #[test]
    fn latin1_upper_half_is_identity() {
        assert_eq!(decode_latin1(&[0xA0, 0xE9, 0xFF]), "\u{A0}éÿ");
    }

    #[test]
    fn utf8_multibyte() {
        assert_eq!(decode_utf8("héllo €".as_bytes()), "héllo €");
    }

    #[test]
    fn utf8_lone_continuation_is_one_dot() {
        assert_eq!(decode_utf8(&[0x80]), ".");
        assert_eq!(decode_utf8(&[b'a', 0x80, b'b']), "a.b");
    }

    #[test]
    fn utf8_truncated_sequence_dots_each_byte() {
        // E2 82 is the start of a three-byte sequence cut short.
        assert_eq!(decode_utf8(&[0xE2, 0x82, b'A']), "..A");
        assert_eq!(decode_utf8(&[b'A', 0xE2, 0x82]), "A..");
    }

    #[test]
    fn utf8_non_printable_code_points() {
        // NUL, tab, NBSP, zero-width space (format)
        assert_eq!(decode_utf8("\0\t\u{A0}\u{200B}".as_bytes()), "....");
    }

    #[test]
    fn utf16le_basic() {
        let bytes: Vec<u8> = "Hi!".encode_utf16().flat_map(u16::to_le_bytes).collect();
        assert_eq!(decode_utf16le(&bytes), "Hi!");
    }

    #[test]
    fn utf16le_odd_length_trailing_dot() {
        assert_eq!(decode_utf16le(&[b'H', 0x00, b'i']), "H.");
        assert_eq!(decode_utf16le(&[0x41]), ".");
    }

    #[test]
    fn utf16le_surrogates_decoded_independently() {
        // U+1F600 as D83D DE00: two units, two replacement glyphs.
        let bytes = [0x3D, 0xD8, 0x00, 0xDE];
        assert_eq!(decode_utf16le(&bytes), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn utf16le_control_unit_is_dot() {
        assert_eq!(decode_utf16le(&[0x0A, 0x00, 0x41, 0x00]), ".A");
    }

    #[test]
    fn gb18030_valid_text() {
        // "中文" in GB 18030
        assert_eq!(decode_gb18030(&[0xD6, 0xD0, 0xCE, 0xC4]), "中文");
        assert_eq!(decode_gb18030(b"abc"), "abc");
    }

    #[test]
    fn gb18030_invalid_input_one_dot_per_byte() {
        assert_eq!(decode_gb18030(&[0xFF, 0xFF, 0xFF]), "...");
        // A valid character followed by a truncated lead byte still fails whole.
        assert_eq!(decode_gb18030(&[0xD6, 0xD0, 0x81]), "...");
    }

    #[test]
    fn gb18030_control_chars_are_dots() {
        assert_eq!(decode_gb18030(&[b'a', 0x00, b'b']), "a.b");
    }

    #[test]
    fn decode_dispatches_by_encoding() {
        let data = [0xC3, 0xA9];
        assert_eq!(decode(&data, Encoding::Latin1), "Ã©");
        assert_eq!(decode(&data, Encoding::Utf8), "é");
        assert_eq!(decode(&[b'A', 0x00], Encoding::Utf16Le), "A");
        assert_eq!(decode(&[0xFF], Encoding::Gb18030), ".");
    }

    #[test]
    fn printable_classification() {
        assert!(is_printable('a'));
        assert!(is_printable(' '));
        assert!(is_printable('€'));
        assert!(!is_printable('\n'));
        assert!(!is_printable('\u{A0}'));
        assert!(!is_printable('\u{E000}'));
    }
}
