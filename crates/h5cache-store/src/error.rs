use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache root {0} does not exist")]
    RootMissing(PathBuf),

    #[error("cache root {0} is not a directory")]
    RootNotDirectory(PathBuf),

    #[error("failed to create shard directory {path}")]
    CreateShard {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to commit payload to {path}")]
    Commit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
