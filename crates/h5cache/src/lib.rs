//! Content-addressed cache fill for HDF5 payloads.
//!
//! Resolves a 40-hex content hash to a file in a hash-sharded local cache:
//! validate → probe → fetch the torrent descriptor from the object store →
//! drive the transfer engine → commit the payload atomically. The pipeline
//! is binary per invocation: it either leaves the complete payload at the
//! canonical path (or finds it already there) or it fails with a mapped
//! exit code, never a partial state.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{CACHE_ROOT_ENV, Config, DEFAULT_BASE_URL};
pub use error::PipelineError;
pub use pipeline::{Outcome, Pipeline};
