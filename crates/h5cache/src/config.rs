use std::path::PathBuf;
use std::time::Duration;

use h5cache_fetch::FetchOptions;

/// Object store endpoint the cache descriptors live behind.
pub const DEFAULT_BASE_URL: &str = "https://s3.amazonaws.com/nemaload.data/cache";

/// Environment variable supplying the cache root when no directory argument
/// is given.
pub const CACHE_ROOT_ENV: &str = "HDF5CACHE";

/// Explicit pipeline configuration.
///
/// Everything the pipeline needs arrives here; there are no implicit
/// globals and no environment lookups below this layer.
#[derive(Clone, Debug)]
pub struct Config {
    /// Remote store endpoint serving `{base}/{prefix}/{suffix}?torrent`.
    pub base_url: String,

    /// Local shard root; must already exist.
    pub cache_root: PathBuf,

    /// Pass verbosity through to the transfer engine.
    pub verbose: bool,

    /// Retry policy for the descriptor fetch.
    pub fetch: FetchOptions,

    /// Overall deadline for one transfer; `None` waits indefinitely, which
    /// with no reachable peers can be a very long time.
    pub transfer_timeout: Option<Duration>,
}

impl Config {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            cache_root: cache_root.into(),
            verbose: false,
            fetch: FetchOptions::default(),
            transfer_timeout: None,
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn fetch(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    #[must_use]
    pub fn transfer_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.transfer_timeout = timeout;
        self
    }
}
