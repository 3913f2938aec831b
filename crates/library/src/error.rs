//! Library Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Every failure surfaced by a pipeline
//! stream names the unit of work it belongs to, so a batch report can list
//! them without further context.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A library error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A series or range listing could not be read.
    #[display("failed to crawl {_0}")]
    Crawl(#[error(not(source))] String),
    /// One specification folder could not be resolved, fetched or extracted.
    #[display("failed to download {_0}")]
    Download(#[error(not(source))] String),
    /// A document could not be converted to PDF.
    #[display("failed to convert {}", _0.display())]
    Convert(#[error(not(source))] PathBuf),
    /// A specification's parts could not be merged (or cleaned up after).
    #[display("failed to merge {_0}")]
    Merge(#[error(not(source))] String),
    /// The destination directory could not be listed.
    #[display("failed to read directory {}", _0.display())]
    ReadDir(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Crawl(_) | Self::Download(_))
    }
}
