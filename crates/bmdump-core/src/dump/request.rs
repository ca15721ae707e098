//! Memory dump requests.

use super::destination::command_text;
use crate::error::{Error, Result};
use crate::geometry::BufferGeometry;
use std::path::Path;

/// A request to write `[start, start + length)` of target memory to a file
///
/// The destination is kept as the exact text named in the command; paths that
/// are not UTF-8 or contain a double quote are refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpRequest {
    start: u64,
    length: u64,
    destination: String,
}

impl DumpRequest {
    /// Request covering the buffer geometry
    pub fn for_geometry(geometry: &BufferGeometry, destination: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            start: geometry.base,
            length: geometry.data_length,
            destination: command_text(destination.as_ref())?.to_string(),
        })
    }

    /// Request for a fixed region, without any header lookup
    pub fn region(start: u64, length: u64, destination: impl AsRef<Path>) -> Result<Self> {
        if length == 0 {
            return Err(Error::invalid_region(start, length, "length is zero"));
        }
        if start.checked_add(length).is_none() {
            return Err(Error::invalid_region(
                start,
                length,
                "region exceeds the 64-bit address space",
            ));
        }
        Ok(Self {
            start,
            length,
            destination: command_text(destination.as_ref())?.to_string(),
        })
    }

    /// First byte to dump
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Number of bytes to dump
    pub fn length(&self) -> u64 {
        self.length
    }

    /// One past the last byte to dump
    pub fn end(&self) -> u64 {
        self.start + self.length
    }

    /// File the memory is written to
    pub fn destination(&self) -> &Path {
        Path::new(&self.destination)
    }

    /// The debugger command performing the dump
    pub fn command(&self) -> String {
        format!(
            "dump binary memory \"{}\" 0x{:x} +{}",
            self.destination,
            self.start,
            self.length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::DestinationFault;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_geometry_command() {
        let geometry = BufferGeometry {
            base: 0x2050_0000,
            data_length: 66,
            buffer_length: 100,
            total_written: 50,
        };
        let request = DumpRequest::for_geometry(&geometry, "/tmp/barman.raw").unwrap();
        assert_eq!(request.end(), 0x2050_0000 + 66);
        assert_eq!(
            request.command(),
            "dump binary memory \"/tmp/barman.raw\" 0x20500000 +66"
        );
    }

    #[test]
    fn test_region_checks() {
        assert!(DumpRequest::region(0x2050_0000, 0x30_0000, "/tmp/b.raw").is_ok());
        assert!(matches!(
            DumpRequest::region(0x1000, 0, "/tmp/b.raw"),
            Err(Error::InvalidRegion { .. })
        ));
        assert!(matches!(
            DumpRequest::region(u64::MAX, 2, "/tmp/b.raw"),
            Err(Error::InvalidRegion { .. })
        ));
    }

    #[test]
    fn test_quote_cannot_reach_command() {
        let err = DumpRequest::region(0x1000, 16, "/tmp/a\" 0x0 +1 \"b").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDestination {
                reason: DestinationFault::ContainsQuote,
                ..
            }
        ));
    }
}
