//! Reading the barman protocol header from the target.
//!
//! The header is read field by field through a [`VariableReader`]. Any failed
//! read aborts the whole header: a partially populated header is never
//! returned.

use crate::error::{Error, Result};
use crate::session::{VariableReader, VariableValue};
use crate::symbols::QualifiedSymbol;
use tracing::debug;

/// Field path of the header region length
pub const HEADER_LENGTH_FIELD: &str = "->header_length";
/// Field path of the data store base pointer
pub const BASE_POINTER_FIELD: &str = "->data_store_parameters.base_pointer";
/// Field path of the circular buffer capacity
pub const BUFFER_LENGTH_FIELD: &str = "->data_store_parameters.buffer_length";
/// Field path of the cumulative byte count
pub const TOTAL_WRITTEN_FIELD: &str = "->data_store_parameters.total_written";

/// Snapshot of the in-memory capture buffer descriptor
///
/// Values are kept as read, in a signed type wide enough for any 64-bit
/// quantity, so that corrupt (negative) contents can be reported instead of
/// wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolHeader {
    /// Address of the header structure
    pub header_address: i128,
    /// Size of the header region preceding the data store
    pub header_length: i128,
    /// Address where capture data begins
    pub base_pointer: i128,
    /// Capacity of the circular buffer in bytes
    pub buffer_length: i128,
    /// Bytes ever written; exceeds `buffer_length` once wrapped
    pub total_written: i128,
}

/// Read the protocol header through `reader`
///
/// The symbol itself must read as a scalar (the header pointer). A composite
/// value means barman was built for a different capture mode.
pub fn read_header<R>(symbol: &QualifiedSymbol, reader: &mut R) -> Result<ProtocolHeader>
where
    R: VariableReader + ?Sized,
{
    let path = symbol.to_string();
    let header_address = match reader
        .read_value(&path)
        .map_err(|e| Error::remote_read(&path, e.message()))?
    {
        VariableValue::Scalar(v) => v,
        VariableValue::Composite(_) => return Err(Error::not_scalar(path)),
    };

    let header = ProtocolHeader {
        header_address,
        header_length: read_field(symbol, HEADER_LENGTH_FIELD, reader)?,
        base_pointer: read_field(symbol, BASE_POINTER_FIELD, reader)?,
        buffer_length: read_field(symbol, BUFFER_LENGTH_FIELD, reader)?,
        total_written: read_field(symbol, TOTAL_WRITTEN_FIELD, reader)?,
    };

    debug!("Read header {:?}", header);
    Ok(header)
}

fn read_field<R>(symbol: &QualifiedSymbol, suffix: &str, reader: &mut R) -> Result<i128>
where
    R: VariableReader + ?Sized,
{
    let path = symbol.field(suffix);
    match reader.read_value(&path) {
        Ok(VariableValue::Scalar(v)) => Ok(v),
        Ok(VariableValue::Composite(text)) => Err(Error::remote_read(
            path,
            format!("expected an integer, got '{}'", text),
        )),
        Err(e) => Err(Error::remote_read(path, e.message())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TranscriptSession;
    use pretty_assertions::assert_eq;

    fn symbol() -> QualifiedSymbol {
        QualifiedSymbol::new("barman.c", "bm_protocol_header_")
    }

    fn session() -> TranscriptSession {
        TranscriptSession::new(
            "",
            "\"barman.c\"::bm_protocol_header_ = (struct bm_protocol_header *) 0x1000\n\
             \"barman.c\"::bm_protocol_header_->header_length = 16\n\
             \"barman.c\"::bm_protocol_header_->data_store_parameters.base_pointer = 0x1010\n\
             \"barman.c\"::bm_protocol_header_->data_store_parameters.buffer_length = 100\n\
             \"barman.c\"::bm_protocol_header_->data_store_parameters.total_written = 50\n",
        )
        .unwrap()
    }

    #[test]
    fn test_read_header() {
        let mut session = session();
        let header = read_header(&symbol(), &mut session).unwrap();
        assert_eq!(
            header,
            ProtocolHeader {
                header_address: 0x1000,
                header_length: 16,
                base_pointer: 0x1010,
                buffer_length: 100,
                total_written: 50,
            }
        );
        assert_eq!(session.reads().len(), 5);
        assert!(session.reads()[4].ends_with(TOTAL_WRITTEN_FIELD));
    }

    #[test]
    fn test_composite_header_is_not_scalar() {
        let mut session = session().with_value(
            "\"barman.c\"::bm_protocol_header_",
            "{header_length = 16, data_store_parameters = {...}}",
        );
        let err = read_header(&symbol(), &mut session).unwrap_err();
        assert!(matches!(err, Error::NotScalar { .. }));
        assert_eq!(session.reads().len(), 1);
    }

    #[test]
    fn test_failed_field_read_aborts() {
        let mut session = session().with_value(
            "\"barman.c\"::bm_protocol_header_->data_store_parameters.base_pointer",
            "<error: Cannot access memory at address 0x1004>",
        );
        let err = read_header(&symbol(), &mut session).unwrap_err();
        match err {
            Error::RemoteRead { path, message } => {
                assert!(path.ends_with(BASE_POINTER_FIELD));
                assert!(message.contains("Cannot access memory"), "message: {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.reads().len(), 3);
    }

    #[test]
    fn test_missing_header_symbol() {
        let mut session = TranscriptSession::default();
        let err = read_header(&symbol(), &mut session).unwrap_err();
        assert!(matches!(err, Error::RemoteRead { .. }));
    }

    #[test]
    fn test_negative_values_are_kept() {
        let mut session = session().with_value(
            "\"barman.c\"::bm_protocol_header_->header_length",
            "-4",
        );
        let header = read_header(&symbol(), &mut session).unwrap();
        assert_eq!(header.header_length, -4);
    }
}
