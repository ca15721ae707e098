//! Error types for the bmdump-core library.
//!
//! Every variant is terminal for the invocation that produced it. The
//! `Display` output of each variant is the diagnostic shown to the operator.

use crate::dump::DestinationFault;
use crate::geometry::HeaderFault;
use crate::session::SessionError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bmdump operations
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all bmdump operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No translation unit in the variable listing declares the header symbol
    #[error("no declaration of '{symbol}' found in the variable listing")]
    SymbolNotFound {
        /// The symbol name that was searched for
        symbol: String,
    },

    /// The header symbol resolved to a composite value
    #[error(
        "{symbol} appears to be a struct; is barman configured for in-memory capture?"
    )]
    NotScalar {
        /// The qualified symbol that was read
        symbol: String,
    },

    /// Reading a header field from the target failed
    #[error("could not read barman header field '{path}': {message}")]
    RemoteRead {
        /// The field path that was being read
        path: String,
        /// Diagnostic from the variable reader
        message: String,
    },

    /// The header contents are inconsistent
    #[error("invalid header contents: {0}")]
    InvalidHeader(HeaderFault),

    /// The dump destination cannot be used
    #[error("invalid destination '{path}': {reason}")]
    InvalidDestination {
        /// The destination as given (absolutized when possible)
        path: PathBuf,
        /// Why it was rejected
        reason: DestinationFault,
    },

    /// A fixed region dump was requested with an unusable range
    #[error("invalid region 0x{start:x} +{length}: {details}")]
    InvalidRegion {
        /// Requested start address
        start: u64,
        /// Requested length in bytes
        length: u64,
        /// What is wrong with it
        details: &'static str,
    },

    /// A session operation other than a field read failed
    #[error("debug session error: {0}")]
    Session(#[from] SessionError),

    /// The pipeline already reached a terminal state
    #[error("pipeline already finished ({stage}); start a new invocation")]
    PipelineFinished {
        /// Terminal stage the pipeline is in
        stage: String,
    },
}

impl Error {
    /// Creates a new symbol-not-found error
    pub fn symbol_not_found(symbol: impl Into<String>) -> Self {
        Self::SymbolNotFound {
            symbol: symbol.into(),
        }
    }

    /// Creates a new not-scalar error
    pub fn not_scalar(symbol: impl Into<String>) -> Self {
        Self::NotScalar {
            symbol: symbol.into(),
        }
    }

    /// Creates a new remote read error
    pub fn remote_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new invalid destination error
    pub fn invalid_destination(path: impl Into<PathBuf>, reason: DestinationFault) -> Self {
        Self::InvalidDestination {
            path: path.into(),
            reason,
        }
    }

    /// Creates a new invalid region error
    pub fn invalid_region(start: u64, length: u64, details: &'static str) -> Self {
        Self::InvalidRegion {
            start,
            length,
            details,
        }
    }
}
