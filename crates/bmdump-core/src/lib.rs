//! # bmdump-core
//!
//! A library for locating and extracting the barman in-memory capture buffer
//! of a halted embedded target through a remote debug session.
//!
//! This crate provides the core functionality for:
//! - Finding the translation unit that declares the protocol header
//! - Reading the header fields through typed variable reads
//! - Turning the header into a validated, wraparound-aware byte range
//! - Reporting the buffer state and issuing the memory dump command
//!
//! ## Architecture
//!
//! The pipeline runs leaf-first, each stage short-circuiting on failure:
//!
//! - [`symbols`]: Variable listing scanning
//! - [`header`]: Protocol header reads
//! - [`geometry`]: Dump range computation and validation
//! - [`dump`]: Destination checks, reports and the [`Pipeline`]
//! - [`session`]: Contracts consumed from the debug session
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use bmdump_core::{Pipeline, TranscriptSession};
//!
//! let mut session = TranscriptSession::new(
//!     std::fs::read_to_string("info-variables.txt")?,
//!     &std::fs::read_to_string("values.txt")?,
//! )?;
//!
//! let report = Pipeline::new(&mut session).inspect("bmdump")?;
//! print!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`DebugSession`]: Attach the pipeline to a live debugger
//! - [`SymbolLocator`]: Replace the listing scraper
//! - [`DestinationProbe`]: Customize destination checks
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod dump;
pub mod error;
pub mod geometry;
pub mod header;
pub mod session;
pub mod symbols;

// Re-export primary types for convenience
pub use dump::{DestinationProbe, DumpRequest, FsProbe, Pipeline, Report, Stage};
pub use error::{Error, Result};
pub use geometry::{compute_geometry, BufferGeometry, HeaderFault};
pub use header::{read_header, ProtocolHeader};
pub use session::{DebugSession, SessionError, TranscriptSession, VariableReader, VariableValue};
pub use symbols::{find_header_symbol, ListingScanner, QualifiedSymbol, ScannerConfig, SymbolLocator};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
