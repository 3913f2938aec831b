//! Error types for the [`download`](super) module.

use derive_more::{Display, Error};
use std::path::PathBuf;
use std::time::Duration;

/// A download error with automatic location tracking via [`exn::Exn`].
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for download operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Where processing a single folder failed.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Listing the folder or fetching one of its files failed.
    #[display("failed to fetch {_0}")]
    Fetch(#[error(not(source))] String),
    /// The archive was downloaded but could not be unpacked; it is kept.
    #[display("failed to extract {}", _0.display())]
    Extract(#[error(not(source))] PathBuf),
    /// The folder took longer than the task timeout.
    #[display("timed out after {}s", _0.as_secs())]
    Timeout(#[error(not(source))] Duration),
    /// The task panicked or was cancelled.
    #[display("download task aborted")]
    Task,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Timeout(_))
    }
}
