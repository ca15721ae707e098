//! Human-readable buffer report.

use crate::geometry::BufferGeometry;
use std::fmt;

/// Summary of the capture buffer with commands to reproduce a dump
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    geometry: BufferGeometry,
    program: String,
}

impl Report {
    /// Creates a report; `program` is the name shown in the reproduction line
    pub fn new(geometry: BufferGeometry, program: impl Into<String>) -> Self {
        Self {
            geometry,
            program: program.into(),
        }
    }

    /// The geometry being reported
    pub fn geometry(&self) -> &BufferGeometry {
        &self.geometry
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.geometry;

        writeln!(f, "Barman memory buffer details:")?;
        writeln!(f, "    Base address:  0x{:016x}", g.base)?;
        writeln!(f, "    Dump length:   {}", g.data_length)?;
        match g.percent_written() {
            Some(pct) => writeln!(
                f,
                "    Bytes written: {} of {} ({:.1}%)",
                g.total_written, g.buffer_length, pct
            )?,
            None => writeln!(
                f,
                "    Bytes written: {} of {} (n/a)",
                g.total_written, g.buffer_length
            )?,
        }
        if g.is_wrapped() {
            writeln!(
                f,
                "       (Values greater than 100% are allowable for circular buffers \
                 and indicate the number of times the buffer has been reused)"
            )?;
            if let Some(passes) = g.wrap_count() {
                writeln!(f, "    Buffer reused: {} full passes", passes)?;
            }
        }
        writeln!(f)?;
        writeln!(f, "To dump this buffer use the command:")?;
        writeln!(f, "    dump memory <PATH> 0x{:x} +{}", g.base, g.data_length)?;
        writeln!(f, "Or use the command:")?;
        writeln!(f, "    {} dump --file <PATH>", self.program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn geometry(buffer_length: u64, total_written: u64, data_length: u64) -> BufferGeometry {
        BufferGeometry {
            base: 0x1000,
            data_length,
            buffer_length,
            total_written,
        }
    }

    #[test]
    fn test_report_layout() {
        let report = Report::new(geometry(100, 50, 66), "bmdump");
        assert_eq!(
            report.to_string(),
            "Barman memory buffer details:\n\
             \x20   Base address:  0x0000000000001000\n\
             \x20   Dump length:   66\n\
             \x20   Bytes written: 50 of 100 (50.0%)\n\
             \n\
             To dump this buffer use the command:\n\
             \x20   dump memory <PATH> 0x1000 +66\n\
             Or use the command:\n\
             \x20   bmdump dump --file <PATH>\n"
        );
    }

    #[test]
    fn test_report_flags_wraparound() {
        let text = Report::new(geometry(100, 500, 116), "bmdump").to_string();
        assert!(text.contains("Bytes written: 500 of 100 (500.0%)"));
        assert!(text.contains("Values greater than 100% are allowable"));
        assert!(text.contains("Buffer reused: 5 full passes"));
        assert!(text.contains("+116"));
    }

    #[test]
    fn test_report_zero_capacity() {
        let text = Report::new(geometry(0, 0, 16), "bmdump").to_string();
        assert!(text.contains("Bytes written: 0 of 0 (n/a)"));
        assert!(!text.contains("Values greater"));
        assert!(!text.contains("Buffer reused"));
    }
}
