//! Error types and diagnostic reporting for pipeline stations.

use std::fmt;

/// Errors that can occur during station processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    /// Recoverable error that allows the station to continue processing.
    Recoverable(String),
    /// Fatal error that requires the station to shut down.
    Fatal(String),
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            StationError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for StationError {}

impl From<crate::error::EchoprintError> for StationError {
    fn from(error: crate::error::EchoprintError) -> Self {
        StationError::Fatal(error.to_string())
    }
}

/// Diagnostic sink shared by the runner and its stations.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a station.
    fn report(&self, station: &str, error: &StationError);

    /// Records a diagnostic line. Ignored unless the reporter wants it.
    fn debug(&self, _station: &str, _message: &str) {}
}

/// Reporter that writes to stderr.
///
/// Errors are always printed; debug lines only at verbosity >= 2.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter {
    verbosity: u8,
}

impl LogReporter {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }
}

impl ErrorReporter for LogReporter {
    fn report(&self, station: &str, error: &StationError) {
        eprintln!("[{}] {}", station, error);
    }

    fn debug(&self, station: &str, message: &str) {
        if self.verbosity >= 2 {
            eprintln!("[{}] {}", station, message);
        }
    }
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ErrorReporter for NullReporter {
    fn report(&self, _station: &str, _error: &StationError) {}
}
