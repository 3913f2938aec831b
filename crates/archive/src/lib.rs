//! Archive detection and extraction.
//!
//! Specification deliveries are zip bundles. This crate wraps the `zip`
//! library behind an [`Archive`] enum providing:
//!
//! - **Format detection** from file extensions ([`Archive::from_path`]) or
//!   magic bytes ([`Archive::from_magic_bytes`])
//! - **Extraction** into a directory ([`Archive::extract`])
//! - **Extract-and-remove** ([`extract_in_place`]), which deletes the archive
//!   only once every entry has been written

mod construct;
pub mod error;
mod ops;

pub use crate::ops::{Extracted, extract_in_place};

/// A supported archive format.
///
/// Defaults to [`None`](Self::None) (not an archive).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Archive {
    /// Not an archive
    #[default]
    None,
    /// Zip archive (.zip)
    Zip,
}
impl Archive {
    pub fn is_archive(&self) -> bool {
        !matches!(self, Archive::None)
    }
}
