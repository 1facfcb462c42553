use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream of response body chunks.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A minimal HTTP response: status line plus body stream.
///
/// The status is surfaced explicitly rather than folded into the client's
/// error type so the fetcher can distinguish "store said no" from "network
/// broke" when deciding whether to retry.
pub struct HttpResponse<E> {
    pub status: u16,
    pub body: BoxStream<'static, std::result::Result<Bytes, E>>,
}

/// Asynchronous HTTP client abstraction.
///
/// The one operation the descriptor fetch needs: open a GET and stream the
/// body. Implementations handle their own redirects and connection reuse.
/// [`ReqwestClient`] is the production implementation; tests implement the
/// trait directly with canned responses.
pub trait HttpClient: Send + Sync {
    /// Transport-level error type (DNS, connect, TLS, mid-body resets).
    type Error: std::error::Error + Send + 'static;

    /// Open a streaming GET request.
    ///
    /// Returns the response status and body stream, or a transport error if
    /// no response was obtained at all. Non-success statuses are returned,
    /// not mapped to errors; the caller decides what they mean.
    fn get(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::error::{FetchError, Result};

    /// Identifies us to the object store, in the spirit of the usual
    /// `libcurl-agent/1.0` convention.
    const USER_AGENT: &str = concat!("h5cache/", env!("CARGO_PKG_VERSION"));

    /// Production HTTP client backed by `reqwest`.
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Create a client with the h5cache user agent and a connect timeout.
        pub fn new() -> Result<Self> {
            let client = reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .connect_timeout(std::time::Duration::from_secs(30))
                .build()
                .map_err(|e| FetchError::Network(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &str,
        ) -> std::result::Result<HttpResponse<Self::Error>, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            Ok(HttpResponse {
                status,
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
