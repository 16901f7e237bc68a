pub mod types;
pub mod mapped_file;
pub mod encoding;
pub mod line;
pub mod cache;
pub mod scroll;
pub mod document;
pub mod dump;
pub mod settings;

pub use types::*;
pub use mapped_file::{ByteBuffer, MappedFile};
pub use encoding::{decode, is_printable, PLACEHOLDER};
pub use line::{format_char_line, format_hex_line, format_line, hex_line_width, line_count};
pub use cache::LineCache;
pub use scroll::{Pane, ScrollSync, VirtualWindow};
pub use document::HexDocument;
pub use dump::{dump_region, render_lines, write_dump};
pub use settings::Settings;
