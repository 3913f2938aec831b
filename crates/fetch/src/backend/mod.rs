//! Fetcher trait and implementations.
//!
//! This module defines the [`Fetcher`] trait, the only way the pipeline talks
//! to the archive: reading directory listings and downloading files. The
//! HTTP implementation is [`HttpFetcher`]; tests use the in-memory
//! `MockFetcher` (behind the `mock` feature).

mod http;
#[cfg(feature = "mock")]
mod mock;

pub use self::http::HttpFetcher;
#[cfg(feature = "mock")]
pub use self::mock::MockFetcher;
use crate::error::Result;
use async_trait::async_trait;
use specfetch_listing::{LinkEntry, links};
use std::path::Path;

/// Unified interface for archive access.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// # use specfetch_fetch::{Fetcher, error::Result};
/// # async fn example(fetcher: &dyn Fetcher) -> Result<()> {
/// let series = fetcher.links("https://www.3gpp.org/ftp/Specs/archive/38_series").await?;
/// for entry in series.iter().filter(|entry| entry.is_folder()) {
///     println!("{}", entry.url);
/// }
/// let bytes = fetcher
///     .download("https://www.3gpp.org/ftp/Specs/archive/38_series/38.331/38331-f00.zip", Path::new("38331-f00.zip"))
///     .await?;
/// println!("{bytes} bytes written");
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Name of the fetcher implementation (used for logging only).
    fn name(&self) -> &str;

    /// Fetch the body of a directory-listing page as text.
    async fn listing(&self, url: &str) -> Result<String>;

    /// Fetch `url` and write its body to `save_to`, truncating any existing
    /// file. Returns the number of bytes written.
    async fn download(&self, url: &str, save_to: &Path) -> Result<u64>;

    /// Fetch a directory listing and extract its child links.
    ///
    /// Default implementation of this method runs the body from
    /// [`listing()`](Self::listing) through the link extractor.
    async fn links(&self, url: &str) -> Result<Vec<LinkEntry>> {
        let body = self.listing(url).await?;
        let found: Vec<LinkEntry> = links(url, &body).collect();
        tracing::debug!(url, links = found.len(), "Directory listing parsed");
        Ok(found)
    }
}
