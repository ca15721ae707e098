//! Contracts consumed from the remote debug session.
//!
//! The library never talks to a debugger on its own. Every operation takes the
//! session handle as an explicit parameter, and the session is assumed to
//! serialize commands: there is no locking here.
//!
//! - [`VariableReader`]: typed reads of fully qualified field paths
//! - [`DebugSession`]: adds execution control, the variable listing and raw
//!   command execution on top of [`VariableReader`]
//!
//! [`TranscriptSession`] is an offline implementation replaying captured
//! debugger output.

mod transcript;
mod value;

use thiserror::Error;

pub use transcript::TranscriptSession;
pub use value::VariableValue;

/// Failure reported by a session collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SessionError {
    message: String,
}

impl SessionError {
    /// Creates a new session error from a diagnostic message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The collaborator's diagnostic message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reads typed variables from the target
pub trait VariableReader {
    /// Read the value at `path`, e.g. `"barman.c"::bm_protocol_header_->header_length`
    fn read_value(&mut self, path: &str) -> Result<VariableValue, SessionError>;
}

/// A remote debug session attached to the target
pub trait DebugSession: VariableReader {
    /// Halt target execution so that subsequent reads form a consistent snapshot
    fn stop(&mut self) -> Result<(), SessionError>;

    /// Return the "global and static variables grouped by file" report
    fn list_variables(&mut self) -> Result<String, SessionError>;

    /// Execute a textual debugger command and return its output
    fn execute(&mut self, command: &str) -> Result<String, SessionError>;
}
