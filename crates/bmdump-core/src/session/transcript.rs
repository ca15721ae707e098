//! Offline session replaying captured debugger output.
//!
//! A transcript is made of two captures taken while the target was halted:
//! the variable listing (`info variables`) and a list of `expression = value`
//! lines, one per field read. Commands passed to [`DebugSession::execute`] are
//! recorded rather than run, so the caller decides what to do with them.

use super::{DebugSession, SessionError, VariableReader, VariableValue};
use std::collections::HashMap;
use tracing::{debug, trace};

/// A [`DebugSession`] backed by captured listing and value output
#[derive(Debug, Clone, Default)]
pub struct TranscriptSession {
    listing: String,
    values: HashMap<String, String>,
    stops: usize,
    reads: Vec<String>,
    commands: Vec<String>,
}

impl TranscriptSession {
    /// Creates a session from a variable listing and a value capture
    ///
    /// Value lines are `expression = value`. Blank lines and lines starting
    /// with `#` are ignored. The value text is kept verbatim and parsed on read.
    pub fn new(listing: impl Into<String>, values: &str) -> Result<Self, SessionError> {
        let mut map = HashMap::new();

        for (idx, line) in values.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (expr, value) = line.split_once(" = ").ok_or_else(|| {
                SessionError::new(format!(
                    "value capture line {}: expected 'expression = value'",
                    idx + 1
                ))
            })?;

            trace!("Captured {} = {}", expr.trim(), value.trim());
            map.insert(expr.trim().to_string(), value.trim().to_string());
        }

        debug!("Loaded transcript with {} captured values", map.len());

        Ok(Self {
            listing: listing.into(),
            values: map,
            ..Self::default()
        })
    }

    /// Adds or replaces a captured value
    pub fn with_value(mut self, expr: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(expr.into(), value.into());
        self
    }

    /// Number of stop requests received
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Field paths read so far, in order
    pub fn reads(&self) -> &[String] {
        &self.reads
    }

    /// Commands passed to `execute`, in order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl VariableReader for TranscriptSession {
    fn read_value(&mut self, path: &str) -> Result<VariableValue, SessionError> {
        self.reads.push(path.to_string());
        let text = self
            .values
            .get(path)
            .ok_or_else(|| SessionError::new(format!("No symbol matches {}.", path)))?;
        VariableValue::parse(text)
    }
}

impl DebugSession for TranscriptSession {
    fn stop(&mut self) -> Result<(), SessionError> {
        debug!("Stop requested; transcript target is already halted");
        self.stops += 1;
        Ok(())
    }

    fn list_variables(&mut self) -> Result<String, SessionError> {
        Ok(self.listing.clone())
    }

    fn execute(&mut self, command: &str) -> Result<String, SessionError> {
        debug!("Recording command: {}", command);
        self.commands.push(command.to_string());
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transcript_reads() {
        let mut session = TranscriptSession::new(
            "",
            "# captured at halt\n\nfoo->bar = 0x10\nbaz = $1 = 7\n",
        )
        .unwrap();

        assert_eq!(session.read_value("foo->bar").unwrap(), VariableValue::Scalar(16));
        assert_eq!(session.read_value("baz").unwrap(), VariableValue::Scalar(7));
        assert_eq!(session.reads(), ["foo->bar", "baz"]);
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let mut session = TranscriptSession::new("", "").unwrap();
        let err = session.read_value("missing").unwrap_err();
        assert!(err.message().contains("missing"));
    }

    #[test]
    fn test_malformed_capture_line() {
        let err = TranscriptSession::new("", "a = 1\nnot a pair\n").unwrap_err();
        assert!(err.message().contains("line 2"));
    }

    #[test]
    fn test_execute_records_commands() {
        let mut session = TranscriptSession::default();
        session.stop().unwrap();
        session.execute("dump binary memory \"/tmp/x\" 0x0 +1").unwrap();
        assert_eq!(session.stops(), 1);
        assert_eq!(session.commands().len(), 1);
    }
}
