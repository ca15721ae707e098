//! Dump orchestration for the in-memory capture buffer.
//!
//! [`Pipeline`] runs the whole chain for one invocation against an explicit
//! [`DebugSession`]:
//!
//! ```text
//! Idle -> Scanning -> HeaderRead -> GeometryComputed -> Reporting -> Done
//! Idle -> Validating -> Scanning -> HeaderRead -> GeometryComputed -> Dumping -> Done
//! ```
//!
//! Any error moves the pipeline to `Failed`. `Done` and `Failed` are terminal;
//! a new invocation needs a new pipeline. Nothing is retried.
//!
//! The destination of an export is validated before the target is touched,
//! so a bad path never stops the target.
//!
//! ## Example
//!
//! ```no_run
//! use bmdump_core::dump::{FsProbe, Pipeline};
//! use bmdump_core::session::TranscriptSession;
//!
//! let mut session = TranscriptSession::new(
//!     std::fs::read_to_string("info-variables.txt")?,
//!     &std::fs::read_to_string("values.txt")?,
//! )?;
//!
//! let request = Pipeline::new(&mut session).export("barman.raw", &FsProbe)?;
//! println!("{}", request.command());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod destination;
mod report;
mod request;

use crate::error::{Error, Result};
use crate::geometry::{compute_geometry, BufferGeometry};
use crate::header::read_header;
use crate::session::DebugSession;
use crate::symbols::{ListingScanner, SymbolLocator};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

pub use destination::{validate_destination, DestinationFault, DestinationProbe, FsProbe};
pub use report::Report;
pub use request::DumpRequest;

/// Position of a pipeline in its state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Not started
    Idle,
    /// Stopping the target and resolving the header symbol
    Scanning,
    /// Header fields read
    HeaderRead,
    /// Geometry validated
    GeometryComputed,
    /// Formatting the report
    Reporting,
    /// Checking the destination path
    Validating,
    /// Dump command issued
    Dumping,
    /// Finished successfully
    Done,
    /// Aborted with the given diagnostic
    Failed(String),
}

impl Stage {
    /// True for `Done` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Scanning => f.write_str("scanning"),
            Self::HeaderRead => f.write_str("header read"),
            Self::GeometryComputed => f.write_str("geometry computed"),
            Self::Reporting => f.write_str("reporting"),
            Self::Validating => f.write_str("validating"),
            Self::Dumping => f.write_str("dumping"),
            Self::Done => f.write_str("done"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// One locate/report/dump invocation against a debug session
pub struct Pipeline<'s, S: DebugSession + ?Sized> {
    session: &'s mut S,
    locator: Box<dyn SymbolLocator>,
    stage: Stage,
}

impl<'s, S: DebugSession + ?Sized> Pipeline<'s, S> {
    /// Creates a pipeline using the default listing scanner
    pub fn new(session: &'s mut S) -> Self {
        Self::with_locator(session, ListingScanner::new())
    }

    /// Creates a pipeline with a custom symbol locator
    pub fn with_locator(session: &'s mut S, locator: impl SymbolLocator + 'static) -> Self {
        Self {
            session,
            locator: Box::new(locator),
            stage: Stage::Idle,
        }
    }

    /// Current stage
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Locate the buffer and produce a report
    pub fn inspect(&mut self, program: &str) -> Result<Report> {
        self.begin()?;
        let result = self.locate().map(|geometry| {
            self.enter(Stage::Reporting);
            Report::new(geometry, program)
        });
        self.finish(result)
    }

    /// Validate `destination`, locate the buffer and issue one dump command
    pub fn export<P>(&mut self, destination: impl AsRef<Path>, probe: &P) -> Result<DumpRequest>
    where
        P: DestinationProbe + ?Sized,
    {
        self.begin()?;
        let result = self.run_export(destination.as_ref(), probe);
        self.finish(result)
    }

    /// Validate `destination` and dump a fixed region without header lookup
    pub fn dump_region<P>(
        &mut self,
        start: u64,
        length: u64,
        destination: impl AsRef<Path>,
        probe: &P,
    ) -> Result<DumpRequest>
    where
        P: DestinationProbe + ?Sized,
    {
        self.begin()?;
        let result = self.run_region(start, length, destination.as_ref(), probe);
        self.finish(result)
    }

    fn run_export<P>(&mut self, destination: &Path, probe: &P) -> Result<DumpRequest>
    where
        P: DestinationProbe + ?Sized,
    {
        self.enter(Stage::Validating);
        let destination = validate_destination(destination, probe)?;
        let geometry = self.locate()?;
        self.issue(DumpRequest::for_geometry(&geometry, destination)?)
    }

    fn run_region<P>(
        &mut self,
        start: u64,
        length: u64,
        destination: &Path,
        probe: &P,
    ) -> Result<DumpRequest>
    where
        P: DestinationProbe + ?Sized,
    {
        self.enter(Stage::Validating);
        let destination = validate_destination(destination, probe)?;
        let request = DumpRequest::region(start, length, destination)?;
        self.session.stop()?;
        self.issue(request)
    }

    fn locate(&mut self) -> Result<BufferGeometry> {
        self.enter(Stage::Scanning);
        self.session.stop()?;
        let listing = self.session.list_variables()?;
        let symbol = self
            .locator
            .locate(&listing)
            .ok_or_else(|| Error::symbol_not_found(self.locator.symbol()))?;
        info!("Found barman protocol data variable {}", symbol);

        let header = read_header(&symbol, &mut *self.session)?;
        self.enter(Stage::HeaderRead);

        let geometry = compute_geometry(&header)?;
        self.enter(Stage::GeometryComputed);
        Ok(geometry)
    }

    fn issue(&mut self, request: DumpRequest) -> Result<DumpRequest> {
        self.enter(Stage::Dumping);
        let command = request.command();
        info!("Executing command: {}", command);
        let output = self.session.execute(&command)?;
        if !output.trim().is_empty() {
            debug!("Dump output: {}", output.trim());
        }
        Ok(request)
    }

    fn begin(&self) -> Result<()> {
        if self.stage.is_terminal() {
            Err(Error::PipelineFinished {
                stage: self.stage.to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!("Pipeline {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.enter(Stage::Done),
            Err(e) => {
                warn!("Pipeline aborted while {}: {}", self.stage, e);
                self.stage = Stage::Failed(e.to_string());
            }
        }
        result
    }
}

impl<S: DebugSession + ?Sized> fmt::Debug for Pipeline<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("symbol", &self.locator.symbol())
            .field("stage", &self.stage)
            .finish()
    }
}
