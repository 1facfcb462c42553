//! Descriptor retrieval from the remote object store.
//!
//! The store serves a torrent metadata descriptor for a content hash at
//! `{base}/{prefix}/{suffix}?torrent` (the literal `?torrent` query asks the
//! store for the stored metadata instead of the raw object). This crate owns
//! the URL construction, the streamed accumulation of the response body into
//! a growable buffer, and a bounded retry/backoff policy for transient
//! failures. The HTTP wire stack stays behind the [`HttpClient`] trait.

mod descriptor;
mod error;
mod http;
mod retry;

pub use descriptor::{DescriptorFetcher, FetchOptions, descriptor_url};
pub use error::{FetchError, Result};
pub use http::{BoxStream, HttpClient, HttpResponse};
pub use retry::retry_delay;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
