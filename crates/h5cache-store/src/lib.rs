//! Hash-sharded cache layout with atomic payload placement.
//!
//! The cache is a two-level directory tree: `{root}/{prefix}/{suffix}`,
//! where `prefix`/`suffix` come from a [`ContentHash`]. A payload is only
//! ever made visible at its canonical path by a single `rename` out of a
//! staging artifact in the same shard directory, so a concurrent probe sees
//! either nothing or the complete file, never a partial write.
//!
//! Presence at the canonical path is the cache's entire contract: once a
//! file lands there it is never re-fetched or re-validated.

pub use self::error::{Result, StoreError};

mod error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use h5cache_hash::ContentHash;
use tracing::debug;

/// Resolves cache paths for a fixed root directory.
///
/// Pure path arithmetic; the only I/O lives in the `ensure_*` and probe
/// methods. Resolution is deterministic: the same root and hash always
/// yield identical paths.
#[derive(Clone, Debug)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    /// Create a layout over `root`, stripping any trailing separators so
    /// concatenation never doubles one.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: normalize_root(root.into()),
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    /// Shard directory for a hash: `{root}/{prefix}`.
    pub fn shard_dir(&self, hash: &ContentHash) -> PathBuf {
        self.root.join(hash.prefix())
    }

    /// Canonical payload location: `{root}/{prefix}/{suffix}`.
    pub fn payload_path(&self, hash: &ContentHash) -> PathBuf {
        self.shard_dir(hash).join(hash.suffix())
    }

    /// Staging artifact the transfer engine writes before commit:
    /// `{root}/{prefix}/cache_{prefix}_{suffix}`.
    pub fn staging_path(&self, hash: &ContentHash) -> PathBuf {
        self.shard_dir(hash).join(staging_name(hash))
    }

    /// Existence probe at the canonical path. Presence alone is a hit.
    pub fn is_cached(&self, hash: &ContentHash) -> bool {
        self.payload_path(hash).exists()
    }

    /// Check the cache root exists and is a directory.
    ///
    /// The root is caller-provided configuration and is never created
    /// implicitly; pointing the tool at a missing directory is an error.
    pub fn ensure_root(&self) -> Result<()> {
        let meta = fs::metadata(&self.root)
            .map_err(|_| StoreError::RootMissing(self.root.clone()))?;
        if !meta.is_dir() {
            return Err(StoreError::RootNotDirectory(self.root.clone()));
        }
        Ok(())
    }

    /// Create the single shard level if absent. Racing creators are fine:
    /// `AlreadyExists` is success.
    pub fn ensure_shard_dir(&self, hash: &ContentHash) -> Result<PathBuf> {
        let dir = self.shard_dir(hash);
        match fs::create_dir(&dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "created shard directory");
                Ok(dir)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(dir),
            Err(source) => Err(StoreError::CreateShard { path: dir, source }),
        }
    }
}

/// Staging file name for a hash, `cache_{prefix}_{suffix}`.
pub fn staging_name(hash: &ContentHash) -> String {
    format!("cache_{}_{}", hash.prefix(), hash.suffix())
}

/// Rename a staged payload into its canonical path.
///
/// Staged artifact and destination live in the same shard directory, so the
/// rename is atomic and last-writer-wins; two invocations racing on the same
/// hash both succeed and neither can expose a torn file.
pub fn commit_payload(staged: &Path, payload: &Path) -> Result<()> {
    fs::rename(staged, payload).map_err(|source| StoreError::Commit {
        path: payload.to_path_buf(),
        source,
    })?;
    debug!(path = %payload.display(), "committed payload");
    Ok(())
}

/// Best-effort removal of a staging artifact after a failed transfer.
///
/// Staging lives outside the canonical path, so leaving it behind is a
/// hygiene problem, not a correctness one; errors are ignored.
pub fn discard_staging(staged: &Path) {
    if fs::remove_file(staged).is_ok() {
        debug!(path = %staged.display(), "removed staging artifact");
    }
}

fn normalize_root(root: PathBuf) -> PathBuf {
    let lossy = root.as_os_str().to_string_lossy();
    let trimmed = lossy.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() || trimmed.len() == lossy.len() {
        root
    } else {
        PathBuf::from(trimmed.to_owned())
    }
}
