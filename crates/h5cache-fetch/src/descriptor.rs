use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use h5cache_hash::ContentHash;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};
use crate::http::HttpClient;
use crate::retry::retry_delay;

/// Retry policy for descriptor fetches.
///
/// Total attempts = 1 initial + `max_retries`. Only transient failures are
/// retried (see [`FetchError::is_transient`]).
#[derive(Clone, Copy, Debug)]
pub struct FetchOptions {
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff: Duration::from_millis(100),
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }
}

/// Descriptor URL for a hash: `{base}/{prefix}/{suffix}?torrent`.
///
/// A trailing slash on the base is tolerated; the shard components come from
/// a validated [`ContentHash`] and need no escaping.
pub fn descriptor_url(base_url: &str, hash: &ContentHash) -> String {
    format!(
        "{}/{}/{}?torrent",
        base_url.trim_end_matches('/'),
        hash.prefix(),
        hash.suffix()
    )
}

/// Fetches descriptor bytes for a content hash from the object store.
pub struct DescriptorFetcher<C: HttpClient> {
    client: C,
    base_url: String,
    options: FetchOptions,
}

impl<C: HttpClient> DescriptorFetcher<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            options: FetchOptions::default(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn client(&self) -> &C { &self.client }

    /// Fetch the raw descriptor for `hash`, retrying transient failures
    /// with exponential backoff.
    pub async fn fetch(&self, hash: &ContentHash) -> Result<Bytes> {
        let url = descriptor_url(&self.base_url, hash);
        let mut retry = 0u32;

        loop {
            match self.fetch_once(&url).await {
                Ok(bytes) => {
                    debug!(url = %url, len = bytes.len(), "fetched descriptor");
                    return Ok(bytes);
                }
                Err(e) if e.is_transient() => {
                    if retry >= self.options.max_retries {
                        return Err(FetchError::RetriesExhausted {
                            attempts: retry + 1,
                            last: Box::new(e),
                        });
                    }
                    let delay = retry_delay(retry, self.options.retry_backoff);
                    warn!(url = %url, error = %e, retry, delay_ms = delay.as_millis() as u64,
                        "descriptor fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One attempt: open the GET, stream the body into a growable buffer.
    ///
    /// The buffer carries its own length; descriptors routinely contain
    /// embedded NUL bytes, so nothing here may assume text or termination.
    async fn fetch_once(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !(200..300).contains(&response.status) {
            return Err(FetchError::Status {
                code: response.status,
            });
        }

        let mut body = response.body;
        let mut buf = BytesMut::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| FetchError::Network(e.to_string()))?;
            buf.extend_from_slice(&chunk);
        }

        if buf.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(buf.freeze())
    }
}
