//! External PDF collaborators.
//!
//! Neither merging PDFs nor converting Word documents is done in-process.
//! This crate discovers the external programs that do it and runs them:
//!
//! - [`MergeTool`]/[`Merger`]: `sejda-console`, `qpdf` or `pdfunite`
//! - [`DocumentConverter`]: a headless LibreOffice, or nothing at all

mod convert;
pub mod error;
mod merge;
mod process;
mod tool;

pub use crate::convert::{Conversion, DocumentConverter, is_convertible};
pub use crate::merge::{Merge, Merger};
pub use crate::tool::MergeTool;
