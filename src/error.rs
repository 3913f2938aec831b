//! Errors that stop the program before any batch runs.

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("failed to initialise the HTTP client")]
    Client,
    #[display("no usable PDF merge tool")]
    MergeTool,
    #[display("failed to create destination {}", _0.display())]
    Destination(#[error(not(source))] PathBuf),
}
