use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use hd_core::{dump_region, ByteGrouping, Encoding, FileRegion, HexDocument, Settings};

/// Print a file as a hex dump next to its decoded text.
#[derive(Debug, Parser)]
#[command(name = "hexdump", version)]
struct Cli {
    /// File to dump.
    file: PathBuf,

    /// Bytes per group in the hex column: 1, 2, 4, 8 or 16.
    #[arg(short, long)]
    group: Option<ByteGrouping>,

    /// Text column encoding: latin1, utf8, utf16le or gb18030.
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// Start offset (decimal or 0x-prefixed hex).
    #[arg(short, long, value_parser = parse_offset, default_value = "0")]
    skip: u64,

    /// Number of bytes to dump (decimal or 0x-prefixed hex).
    #[arg(short = 'n', long, value_parser = parse_offset)]
    length: Option<u64>,

    /// JSON settings file with default grouping and encoding.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the file name and size to stderr before the dump.
    #[arg(long)]
    status: bool,
}

/// Parse an offset: `0x` hex or decimal.
fn parse_offset(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid offset {:?}: {}", s, e))
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(grouping) = cli.group {
        settings.grouping = grouping;
    }
    if let Some(encoding) = cli.encoding {
        settings.encoding = encoding;
    }
    log::debug!("settings: {:?}", settings);

    let mut doc = HexDocument::new(settings.line_spec(), settings.window());
    doc.load_path(&cli.file)?;
    if cli.status {
        eprintln!("{}", doc.status_text());
    }

    let length = cli.length.unwrap_or(u64::MAX);
    let region = FileRegion::new(cli.skip, length);
    let written =
        dump_region(out, doc.bytes(), region, &doc.spec()).context("failed to write dump")?;
    log::debug!("wrote {} lines", written);

    out.flush().context("failed to write dump")?;
    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<io::Error>())
        .any(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        // Reader went away (`hexdump big.bin | head`).
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
