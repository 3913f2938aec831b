//! The specification pipeline: crawl the archive, download each
//! specification's newest delivery for a release, convert Word documents and
//! merge multi-part specifications.
//!
//! Every stage is exposed as a stream of progress events (see
//! [`download::download`], [`convert::convert`] and [`merge::merge`]) where
//! failures of a single unit of work are yielded as `Err` items without
//! ending the stream. [`Report`] collects any of them into completed items
//! and failures.

pub mod convert;
pub mod crawl;
pub mod download;
pub mod error;
pub mod merge;
mod report;

pub use crate::report::Report;
use specfetch_config::Config;
use specfetch_fetch::FetcherHandle;
use std::fmt;
use std::time::Duration;

/// Which archive is crawled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Zip bundles of Word documents (`{archive_url}/38_series/38.331/38331-f00.zip`).
    #[default]
    Doc,
    /// Published PDFs (`{etsi_url}/138300_138399/138331/15.02.00_60/*.pdf`).
    Pdf,
}
impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Doc => "doc",
            Self::Pdf => "pdf",
        })
    }
}

/// Everything a download task needs, cheap to clone into spawned tasks.
#[derive(Clone)]
pub struct Context {
    pub fetcher: FetcherHandle,
    pub layout: Layout,
    pub archive_url: String,
    pub etsi_url: String,
    /// Maximum number of folders in flight.
    pub workers: usize,
    /// Upper bound for one folder's resolve, fetch and extract.
    pub task_timeout: Duration,
    /// Unpack downloaded archives (and delete them afterwards).
    pub extract: bool,
}
impl Context {
    pub fn new(fetcher: FetcherHandle, layout: Layout, config: &Config) -> Self {
        Self {
            fetcher,
            layout,
            archive_url: config.archive_url.trim_end_matches('/').to_string(),
            etsi_url: config.etsi_url.trim_end_matches('/').to_string(),
            workers: config.workers.max(1),
            task_timeout: config.task_timeout(),
            extract: config.extract_archives,
        }
    }
}

/// Two-digit series code as used in archive paths (`1` is `01_series`).
pub fn series_code(series: u8) -> String {
    format!("{series:02}")
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(38, "38")]
    #[case(1, "01")]
    #[case(21, "21")]
    fn series_codes(#[case] series: u8, #[case] expected: &str) {
        assert_eq!(series_code(series), expected);
    }

    #[test]
    fn context_trims_base_urls() {
        let config = Config {
            archive_url: "https://archive.test/Specs/archive/".to_string(),
            workers: 0,
            ..Config::default()
        };
        let fetcher: FetcherHandle = std::sync::Arc::new(specfetch_fetch::backend::MockFetcher::default());
        let ctx = Context::new(fetcher, Layout::Doc, &config);
        assert_eq!(ctx.archive_url, "https://archive.test/Specs/archive");
        assert_eq!(ctx.workers, 1);
        assert!(ctx.extract);
    }
}
