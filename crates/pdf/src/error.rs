//! PDF Tool Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A PDF tool error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for PDF tool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("no PDF merge tool (sejda-console, qpdf, pdfunite) detected on your system")]
    MergeToolNotFound,
    #[display("no office suite available for document conversion")]
    ConverterUnavailable,
    /// Only Word documents can be converted.
    #[display("not a convertible document: {}", _0.display())]
    UnsupportedInput(#[error(not(source))] PathBuf),
    /// The tool ran past its time limit and was killed.
    Timeout,
    /// The tool exited with a non-zero exit code.
    #[display("tool exited with code: {_0}")]
    Failed(#[error(not(source))] i32),
    /// The tool was killed by a signal (no exit code).
    #[display("tool terminated by signal")]
    Terminated,
    /// The tool reported success but the expected output does not exist.
    #[display("expected output missing: {}", _0.display())]
    MissingOutput(#[error(not(source))] PathBuf),
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Terminated)
    }
}
