use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    #[error("hash must be 40 hex characters, got length {0}")]
    Length(usize),

    #[error("hash contains non-hex byte {byte:#04x} at index {index}")]
    Charset { byte: u8, index: usize },
}

pub type Result<T> = std::result::Result<T, HashError>;
