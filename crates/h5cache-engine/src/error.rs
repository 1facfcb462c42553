use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed descriptor: {0}")]
    BadDescriptor(String),

    #[error("transfer engine `{0}` not found on PATH")]
    ProgramNotFound(String),

    #[error("transfer engine exited with status {status}")]
    Engine { status: i32 },

    #[error("transfer engine produced no payload at {0}")]
    MissingPayload(PathBuf),

    #[error("transfer cancelled after {0:?}")]
    Cancelled(Duration),

    #[error("transfer I/O error")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
