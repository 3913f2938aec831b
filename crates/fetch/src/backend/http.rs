//! HTTP fetcher backed by [`reqwest`].

use crate::error::{ErrorKind, Result};
use crate::Fetcher;
use async_trait::async_trait;
use exn::ResultExt;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

/// Fetcher for the live archive.
///
/// Every request carries the configured `User-Agent`. There is no overall
/// request timeout here; callers bound whole units of work instead.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: Client,
}
impl HttpFetcher {
    /// Build a fetcher with the given browser-identifying user agent.
    ///
    /// # Errors
    ///
    /// Returns [`Client`](ErrorKind::Client) if the user agent is not a valid
    /// header value or the HTTP client cannot be initialised.
    pub fn new(user_agent: impl AsRef<str>, connect_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent.as_ref()).or_raise(|| ErrorKind::Client)?);
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await.or_raise(|| ErrorKind::Network(url.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn listing(&self, url: &str) -> Result<String> {
        tracing::info!("Parsing directory listing");
        self.get(url).await?.text().await.or_raise(|| ErrorKind::Network(url.to_string()))
    }

    #[instrument(skip(self, save_to), fields(save_to = %save_to.display()))]
    async fn download(&self, url: &str, save_to: &Path) -> Result<u64> {
        let response = self.get(url).await?;
        let io_error = || ErrorKind::Io(save_to.to_path_buf());
        let mut file = File::create(save_to).await.or_raise(io_error)?;
        let mut body = response.bytes_stream();
        let mut written: u64 = 0;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.or_raise(|| ErrorKind::Network(url.to_string()))?;
            file.write_all(&chunk).await.or_raise(io_error)?;
            written = written.saturating_add(chunk.len() as u64);
        }
        file.flush().await.or_raise(io_error)?;
        tracing::debug!(bytes = written, "Download written to disk");
        Ok(written)
    }
}
