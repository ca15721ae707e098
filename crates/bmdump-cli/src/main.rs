//! bmdump - Inspect and dump the barman in-memory capture buffer
//!
//! This tool replays debugger output captured from a halted target, locates
//! the barman protocol header, and prints either a buffer report or the
//! memory dump command that extracts the buffer.

use anyhow::{bail, Context, Result};
use bmdump_core::dump::{FsProbe, Pipeline};
use bmdump_core::symbols::{ListingScanner, ScannerConfig, BM_PROTOCOL_HEADER};
use bmdump_core::TranscriptSession;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Inspect and dump the barman in-memory capture buffer
#[derive(Parser, Debug)]
#[command(name = "bmdump")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Captured "info variables" output of the halted target
    #[arg(short, long, env = "BMDUMP_LISTING", global = true)]
    listing: Option<PathBuf>,

    /// Captured "expression = value" lines for the header fields
    #[arg(long, env = "BMDUMP_VALUES", global = true)]
    values: Option<PathBuf>,

    /// Name of the protocol header variable
    #[arg(long, default_value = BM_PROTOCOL_HEADER, global = true)]
    symbol: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the capture buffer properties
    Inspect,

    /// Dump the capture buffer to a file
    Dump {
        /// File to dump to (must not exist yet)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Dump a fixed memory region to a file, without header lookup
    DumpRegion {
        /// Start address (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_u64)]
        address: u64,

        /// Length in bytes (decimal or 0x-prefixed hex)
        #[arg(short = 'n', long, value_parser = parse_u64)]
        length: u64,

        /// File to dump to (must not exist yet)
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("bmdump-core {}", bmdump_core::VERSION);

    let mut session = load_session(&cli)?;
    let scanner = ListingScanner::with_config(ScannerConfig::new().symbol(&cli.symbol));
    let mut pipeline = Pipeline::with_locator(&mut session, scanner);

    match &cli.command {
        Command::Inspect => {
            let report = pipeline
                .inspect(env!("CARGO_PKG_NAME"))
                .context("Could not inspect the barman buffer")?;
            print!("{}", report);
        }
        Command::Dump { file } => {
            let request = pipeline
                .export(file, &FsProbe)
                .context("Could not dump the barman buffer")?;
            println!("Executing command:");
            println!("    {}", request.command());
        }
        Command::DumpRegion {
            address,
            length,
            file,
        } => {
            let request = pipeline
                .dump_region(*address, *length, file, &FsProbe)
                .context("Could not dump the memory region")?;
            println!("Executing command:");
            println!("    {}", request.command());
        }
    }

    Ok(())
}

/// Build the offline session from the captured listing and values
fn load_session(cli: &Cli) -> Result<TranscriptSession> {
    let listing = match (&cli.command, &cli.listing) {
        (_, Some(path)) => read_capture(path)?,
        (Command::DumpRegion { .. }, None) => String::new(),
        (_, None) => bail!("--listing is required to locate the barman header"),
    };

    let values = match (&cli.command, &cli.values) {
        (_, Some(path)) => read_capture(path)?,
        (Command::DumpRegion { .. }, None) => String::new(),
        (_, None) => bail!("--values is required to read the barman header"),
    };

    TranscriptSession::new(listing, &values).context("Invalid value capture")
}

fn read_capture(path: &Path) -> Result<String> {
    if !path.is_file() {
        bail!("Capture file does not exist: {}", path.display());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read capture file: {}", path.display()))
}

/// Parse a decimal or 0x-prefixed hexadecimal number
fn parse_u64(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}
