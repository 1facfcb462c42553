//! The cache-fill pipeline: validate → probe → fetch → transfer → commit.

use std::path::{Path, PathBuf};
use std::time::Duration;

use h5cache_engine::{
    Descriptor, EngineError, TransferEngine, TransferJob, TransferOptions, TransferOutcome,
};
use h5cache_fetch::{DescriptorFetcher, HttpClient};
use h5cache_hash::ContentHash;
use h5cache_store::CacheLayout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::PipelineError;

/// How the payload came to be at its canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Already cached; nothing was fetched.
    Hit(PathBuf),

    /// Fetched and transferred during this invocation.
    Fetched(PathBuf),
}

impl Outcome {
    pub fn path(&self) -> &Path {
        match self {
            Outcome::Hit(p) | Outcome::Fetched(p) => p,
        }
    }
}

/// Sequences the cache-fill stages over injected collaborators.
///
/// Single-threaded and sequential per invocation; the only unbounded wait
/// is the transfer itself, bounded here by `transfer_timeout` when set.
pub struct Pipeline<C: HttpClient, E: TransferEngine> {
    layout: CacheLayout,
    fetcher: DescriptorFetcher<C>,
    engine: E,
    transfer: TransferOptions,
    transfer_timeout: Option<Duration>,
}

impl<C: HttpClient, E: TransferEngine> Pipeline<C, E> {
    pub fn new(config: &Config, client: C, engine: E) -> Self {
        Self {
            layout: CacheLayout::new(&config.cache_root),
            fetcher: DescriptorFetcher::new(client, config.base_url.clone())
                .options(config.fetch),
            engine,
            transfer: TransferOptions::default().verbose(config.verbose),
            transfer_timeout: config.transfer_timeout,
        }
    }

    /// Replace the transfer options, e.g. to attach a progress callback.
    #[must_use]
    pub fn transfer_options(mut self, transfer: TransferOptions) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn client(&self) -> &C { self.fetcher.client() }

    pub fn engine(&self) -> &E { &self.engine }

    /// Resolve `hash` to a cached file.
    ///
    /// Validation runs before any filesystem or network access; a probe hit
    /// returns without touching the network at all.
    pub async fn run(&self, hash: &str) -> Result<Outcome, PipelineError> {
        let hash = ContentHash::parse(hash)?;
        self.layout.ensure_root()?;

        let payload_path = self.layout.payload_path(&hash);
        if self.layout.is_cached(&hash) {
            info!(path = %payload_path.display(), "cache hit");
            return Ok(Outcome::Hit(payload_path));
        }

        debug!(hash = %hash, "cache miss, fetching descriptor");
        let raw = self.fetcher.fetch(&hash).await?;
        self.populate(&hash, Descriptor::new(raw)).await
    }

    /// Decode → EnsureShard → Transfer → Commit.
    ///
    /// On any failure nothing is left at the canonical path; staging
    /// artifacts are removed best-effort. If a concurrent invocation raced
    /// us and the payload exists by the time we notice the failure, that is
    /// a hit, not an error.
    ///
    /// The descriptor's payload name must be exactly the staging name for
    /// this hash. The canonical path only ever receives a complete file via
    /// the commit rename; a remote descriptor naming anything else (the
    /// suffix itself, another shard, a traversal) could steer the engine's
    /// in-progress writes onto the canonical path or out of the shard
    /// entirely, so it is rejected before the engine runs.
    async fn populate(
        &self,
        hash: &ContentHash,
        descriptor: Descriptor,
    ) -> Result<Outcome, PipelineError> {
        let job = TransferJob::decode(descriptor)?;
        let staging_name = h5cache_store::staging_name(hash);
        if job.payload_name() != staging_name {
            return Err(EngineError::BadDescriptor(format!(
                "descriptor names payload `{}`, expected `{staging_name}`",
                job.payload_name()
            ))
            .into());
        }

        let shard_dir = self.layout.ensure_shard_dir(hash)?;
        let payload_path = self.layout.payload_path(hash);
        let staging_path = self.layout.staging_path(hash);

        let outcome = match self.transfer(&job, &shard_dir).await {
            Ok(outcome) => outcome,
            Err(e) => {
                h5cache_store::discard_staging(&staging_path);
                if self.layout.is_cached(hash) {
                    warn!(error = %e, "transfer failed but payload appeared, concurrent writer won");
                    return Ok(Outcome::Hit(payload_path));
                }
                return Err(e.into());
            }
        };

        // The engine must have left the payload at the staging path; an
        // outcome pointing anywhere else never reaches the commit rename.
        if outcome.payload != staging_path {
            h5cache_store::discard_staging(&outcome.payload);
            return Err(EngineError::MissingPayload(staging_path).into());
        }

        if let Err(e) = h5cache_store::commit_payload(&outcome.payload, &payload_path) {
            h5cache_store::discard_staging(&outcome.payload);
            if self.layout.is_cached(hash) {
                return Ok(Outcome::Hit(payload_path));
            }
            return Err(e.into());
        }

        info!(path = %payload_path.display(), "payload cached");
        Ok(Outcome::Fetched(payload_path))
    }

    async fn transfer(
        &self,
        job: &TransferJob,
        dest_dir: &Path,
    ) -> Result<TransferOutcome, EngineError> {
        let download = self.engine.download(job, dest_dir, &self.transfer);
        match self.transfer_timeout {
            Some(limit) => tokio::time::timeout(limit, download)
                .await
                .map_err(|_| EngineError::Cancelled(limit))?,
            None => download.await,
        }
    }
}
