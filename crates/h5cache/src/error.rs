use h5cache_engine::EngineError;
use h5cache_fetch::FetchError;
use h5cache_hash::HashError;
use h5cache_store::StoreError;
use thiserror::Error;

use crate::config::CACHE_ROOT_ENV;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Hash(#[from] HashError),

    #[error("no cache directory given and {CACHE_ROOT_ENV} is not set")]
    CacheRootUnset,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transfer(#[from] EngineError),
}

impl PipelineError {
    /// Process exit code for this failure.
    ///
    /// One code per pipeline stage: 3 invalid hash, 4 cache-root problems,
    /// 5 descriptor fetch, 6 decode/transfer/commit. Usage errors exit 2
    /// via clap before a pipeline exists.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Hash(_) => 3,
            PipelineError::CacheRootUnset
            | PipelineError::Store(StoreError::RootMissing(_))
            | PipelineError::Store(StoreError::RootNotDirectory(_)) => 4,
            PipelineError::Fetch(_) => 5,
            PipelineError::Store(_) | PipelineError::Transfer(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_distinct_codes() {
        assert_eq!(
            PipelineError::from(HashError::Length(39)).exit_code(),
            3
        );
        assert_eq!(PipelineError::CacheRootUnset.exit_code(), 4);
        assert_eq!(
            PipelineError::from(StoreError::RootMissing("/x".into())).exit_code(),
            4
        );
        assert_eq!(
            PipelineError::from(FetchError::EmptyBody).exit_code(),
            5
        );
        assert_eq!(
            PipelineError::from(EngineError::BadDescriptor("eof".into())).exit_code(),
            6
        );
    }
}
