//! Error types for h5cache-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("object store answered HTTP {code}")]
    Status { code: u16 },

    #[error("object store returned an empty descriptor")]
    EmptyBody,

    #[error("descriptor fetch failed after {attempts} attempts")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Network failures and 5xx answers are transient; 4xx means the store
    /// does not have the descriptor and retrying would only hammer it.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Status { code } => (500..600).contains(code),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
