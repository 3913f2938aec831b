//! Release Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A release error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The release could not be parsed as an integer.
    #[display("invalid release number: {_0}")]
    InvalidNumber(#[error(not(source))] String),
    /// The release number has no token in the release alphabet.
    #[display("release {value} is out of range (supported: 0..={max})")]
    OutOfRange {
        /// The requested release number.
        value: i64,
        /// The highest supported release number.
        max: usize,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A release number is either valid or it isn't.
        false
    }
}
