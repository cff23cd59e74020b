use std::{collections::TryReserveError, io, result};

use log::error;
use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error types for snapbuf operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Initial allocation or growth failed. `source` is `None` when the
    /// requested capacity does not fit in `usize` at all.
    #[error("Failed to allocate {requested} bytes for snapshot buffer")]
    AllocationFailure {
        requested: usize,
        source: Option<TryReserveError>,
    },

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("Snapshot source exhausted: requested {requested} bytes, {remaining} remaining")]
    SourceExhausted { requested: usize, remaining: usize },
}

impl Error {
    /// Returns `true` for errors after which a snapshot cannot be trusted.
    ///
    /// A buffer that failed to grow mid-write holds a truncated image. Callers
    /// that receive a fatal error should discard the snapshot, and most will
    /// want to terminate the run.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AllocationFailure { .. })
    }

    #[inline]
    pub(crate) fn capacity_overflow(requested: usize) -> Self {
        Self::AllocationFailure {
            requested,
            source: None,
        }
    }
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        let kind = match value {
            Error::AllocationFailure { .. } => io::ErrorKind::OutOfMemory,
            Error::SourceExhausted { .. } => io::ErrorKind::UnexpectedEof,
            Error::InvalidState(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, value)
    }
}

/// Logs and panics on an error the infallible API cannot recover from.
///
/// With `panic = "abort"` this terminates the process with the diagnostic.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: Error) -> ! {
    error!("{err}");
    panic!("{err}")
}
