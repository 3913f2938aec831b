//! In-memory fetcher for testing.

use crate::Fetcher;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use exn::ResultExt;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory fetcher for testing.
///
/// Resources are stored in a `HashMap` keyed by URL behind a [`RwLock`], so
/// all trait methods can operate on `&self`. Unknown URLs answer with a 404
/// status error. Every request is counted, found or not.
///
/// # Examples
///
/// ```
/// use specfetch_fetch::backend::{Fetcher, MockFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let base = "https://example.org/archive/38_series";
/// let fetcher = MockFetcher::with_resources([
///     (base.to_string(), MockFetcher::listing_html(["38.331/", "38.300/"]).into_bytes()),
/// ]);
/// let links = fetcher.links(base).await?;
/// assert_eq!(links.len(), 2);
/// assert_eq!(fetcher.requests(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockFetcher {
    resources: RwLock<HashMap<String, Vec<u8>>>,
    requests: AtomicUsize,
}

impl MockFetcher {
    /// Create a mock fetcher pre-populated with resources.
    pub fn with_resources(resources: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let resources = resources
            .into_iter()
            .map(|(url, data)| (Self::normalize(url.into()), data.into()))
            .collect();
        Self {
            resources: RwLock::new(resources),
            requests: AtomicUsize::new(0),
        }
    }

    /// Add (or replace) a resource.
    pub async fn insert(&self, url: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.resources.write().await.insert(Self::normalize(url.into()), data.into());
    }

    /// Number of requests served so far, including failed ones.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Render a server-style directory listing: a parent-directory anchor
    /// followed by one anchor per child. Children ending in `/` are folders.
    pub fn listing_html<'a>(children: impl IntoIterator<Item = &'a str>) -> String {
        let mut html = String::from("<html><body><pre><A HREF=\"/ftp/\">[To Parent Directory]</A><br><br>");
        for child in children {
            let name = child.trim_end_matches('/');
            html.push_str(&format!("  1/1/2024  1:00 AM  1024 <A HREF=\"/ftp/archive/{child}\">{name}</A><br>"));
        }
        html.push_str("</pre><hr></body></html>");
        html
    }

    fn normalize(url: String) -> String {
        match url.strip_suffix('/') {
            Some(stripped) => stripped.to_string(),
            None => url,
        }
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let key = Self::normalize(url.to_string());
        self.resources.read().await.get(&key).cloned().ok_or_else(|| {
            exn::Exn::from(ErrorKind::Status {
                url: url.to_string(),
                status: 404,
            })
        })
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn listing(&self, url: &str) -> Result<String> {
        let data = self.get(url).await?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    async fn download(&self, url: &str, save_to: &Path) -> Result<u64> {
        let data = self.get(url).await?;
        tokio::fs::write(save_to, &data).await.or_raise(|| ErrorKind::Io(save_to.to_path_buf()))?;
        Ok(data.len() as u64)
    }
}
