//! Buffer geometry derived from a protocol header.
//!
//! The dump starts at the header address rather than at the data store, so
//! header and data are captured contiguously:
//!
//! ```text
//! header_address          base_pointer
//! |<----- offset -------->|<-- min(buffer_length, total_written) -->|
//! |<------------------------- data_length ------------------------->|
//! ```
//!
//! Once `total_written` exceeds `buffer_length` the circular buffer has
//! wrapped and only `buffer_length` bytes are meaningful.

use crate::error::{Error, Result};
use crate::header::ProtocolHeader;
use std::fmt;
use tracing::debug;

/// Reason a header failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFault {
    /// `header_length` is negative
    NegativeHeaderLength,
    /// `buffer_length` is negative
    NegativeBufferLength,
    /// `total_written` is negative
    NegativeTotalWritten,
    /// The data store starts before the header region ends
    DataOverlapsHeader {
        /// `base_pointer - header_address`
        offset: i128,
        /// Declared header region length
        header_length: i128,
    },
    /// The dump range does not fit the 64-bit address space
    RangeOverflow,
}

impl fmt::Display for HeaderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeHeaderLength => f.write_str("header length is negative"),
            Self::NegativeBufferLength => f.write_str("buffer length is negative"),
            Self::NegativeTotalWritten => f.write_str("total written is negative"),
            Self::DataOverlapsHeader {
                offset,
                header_length,
            } => write!(
                f,
                "data store offset {} is smaller than header length {}",
                offset, header_length
            ),
            Self::RangeOverflow => f.write_str("dump range exceeds the 64-bit address space"),
        }
    }
}

/// Validated byte range holding the header and the valid captured data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferGeometry {
    /// Absolute address to dump from (the header address)
    pub base: u64,
    /// Bytes from `base` covering header and valid data
    pub data_length: u64,
    /// Capacity of the circular buffer
    pub buffer_length: u64,
    /// Bytes ever written
    pub total_written: u64,
}

impl BufferGeometry {
    /// One past the last byte of the dump range
    pub fn end(&self) -> u64 {
        self.base + self.data_length
    }

    /// True once older data has been overwritten
    pub fn is_wrapped(&self) -> bool {
        self.total_written > self.buffer_length
    }

    /// Fill level in percent; may exceed 100 for a wrapped buffer
    ///
    /// Returns `None` for a zero-capacity buffer.
    pub fn percent_written(&self) -> Option<f64> {
        (self.buffer_length != 0)
            .then(|| 100.0 * self.total_written as f64 / self.buffer_length as f64)
    }

    /// Number of complete passes over the buffer
    pub fn wrap_count(&self) -> Option<u64> {
        self.total_written.checked_div(self.buffer_length)
    }
}

/// Compute and validate the dump range for `header`
pub fn compute_geometry(header: &ProtocolHeader) -> Result<BufferGeometry> {
    let offset = header.base_pointer.saturating_sub(header.header_address);
    let valid_length = header.buffer_length.min(header.total_written);

    if header.header_length < 0 {
        return Err(Error::InvalidHeader(HeaderFault::NegativeHeaderLength));
    }
    if header.buffer_length < 0 {
        return Err(Error::InvalidHeader(HeaderFault::NegativeBufferLength));
    }
    if header.total_written < 0 {
        return Err(Error::InvalidHeader(HeaderFault::NegativeTotalWritten));
    }
    if offset < header.header_length {
        return Err(Error::InvalidHeader(HeaderFault::DataOverlapsHeader {
            offset,
            header_length: header.header_length,
        }));
    }

    let data_length = valid_length.saturating_add(offset);
    let to_u64 = |v: i128| u64::try_from(v).map_err(|_| Error::InvalidHeader(HeaderFault::RangeOverflow));

    let base = to_u64(header.header_address)?;
    let data_length = to_u64(data_length)?;
    if base.checked_add(data_length).is_none() {
        return Err(Error::InvalidHeader(HeaderFault::RangeOverflow));
    }

    let geometry = BufferGeometry {
        base,
        data_length,
        buffer_length: to_u64(header.buffer_length)?,
        total_written: to_u64(header.total_written)?,
    };

    debug!(
        "Geometry: base=0x{:x} data_length={} (offset {}, valid {})",
        geometry.base, geometry.data_length, offset, valid_length
    );
    Ok(geometry)
}
