//! Destination path checks for buffer dumps.
//!
//! A dump never overwrites anything: the destination must be a fresh path
//! inside an existing directory.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Reason a destination path was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationFault {
    /// No path was given
    Empty,
    /// The path is relative and the working directory is unknown
    Unresolvable,
    /// A file already exists at the path
    AlreadyExists,
    /// Something other than a file (e.g. a directory) exists at the path
    NotAFile,
    /// The path is not valid UTF-8 and cannot be named in a command
    NotUtf8,
    /// The path contains a double quote, which would end the quoted command argument
    ContainsQuote,
    /// The containing directory does not exist
    MissingParentDirectory {
        /// The directory that was expected
        parent: PathBuf,
    },
}

impl fmt::Display for DestinationFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("no path given"),
            Self::Unresolvable => f.write_str("cannot resolve a relative path without a working directory"),
            Self::AlreadyExists => f.write_str("already exists"),
            Self::NotAFile => f.write_str("does not point to a file"),
            Self::NotUtf8 => f.write_str("path is not valid UTF-8"),
            Self::ContainsQuote => f.write_str("path contains a double quote"),
            Self::MissingParentDirectory { parent } => {
                write!(f, "directory '{}' does not exist", parent.display())
            }
        }
    }
}

/// Filesystem queries used to validate a destination
pub trait DestinationProbe {
    /// True if a regular file exists at `path`
    fn is_file(&self, path: &Path) -> bool;

    /// True if anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// True if a directory exists at `path`
    fn is_dir(&self, path: &Path) -> bool;

    /// Directory relative paths are resolved against
    fn current_dir(&self) -> Option<PathBuf>;
}

/// Probe backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl DestinationProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }
}

/// Validate `path` as a dump destination and return it in absolute form
pub fn validate_destination<P>(path: impl AsRef<Path>, probe: &P) -> Result<PathBuf>
where
    P: DestinationProbe + ?Sized,
{
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_destination(path, DestinationFault::Empty));
    }

    let absolute = if path.is_absolute() {
        normalize(path)
    } else {
        let cwd = probe
            .current_dir()
            .ok_or_else(|| Error::invalid_destination(path, DestinationFault::Unresolvable))?;
        normalize(&cwd.join(path))
    };

    command_text(&absolute)?;

    if probe.is_file(&absolute) {
        return Err(Error::invalid_destination(absolute, DestinationFault::AlreadyExists));
    }
    if probe.exists(&absolute) {
        return Err(Error::invalid_destination(absolute, DestinationFault::NotAFile));
    }

    let parent = absolute.parent().map(Path::to_path_buf).unwrap_or_default();
    if parent.as_os_str().is_empty() || !probe.is_dir(&parent) {
        return Err(Error::invalid_destination(
            absolute,
            DestinationFault::MissingParentDirectory { parent },
        ));
    }

    debug!("Destination {} accepted", absolute.display());
    Ok(absolute)
}

/// The path as it appears in a dump command
///
/// The command names the file verbatim between double quotes, so the text
/// must be exactly the path that was checked.
pub(crate) fn command_text(path: &Path) -> Result<&str> {
    let text = path
        .to_str()
        .ok_or_else(|| Error::invalid_destination(path, DestinationFault::NotUtf8))?;
    if text.contains('"') {
        return Err(Error::invalid_destination(path, DestinationFault::ContainsQuote));
    }
    Ok(text)
}

/// Lexically remove `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
