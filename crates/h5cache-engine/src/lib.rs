//! Torrent descriptor model and transfer engine abstraction.
//!
//! A [`Descriptor`] is the raw metadata buffer fetched from the object
//! store; [`TransferJob::decode`] parses it into a [`Metainfo`] before any
//! transfer starts, so a malformed descriptor fails fast and cheap. The
//! peer-to-peer machinery itself stays behind the [`TransferEngine`] trait:
//! given a decoded job and a destination directory, drive the transfer to
//! completion or report failure, optionally emitting progress from its own
//! scheduling.
//!
//! [`CommandEngine`] is the shipped implementation; it delegates to an
//! external torrent client process, which keeps the engine a black box.

pub use self::command::CommandEngine;
pub use self::descriptor::Descriptor;
pub use self::engine::{
    TransferEngine, TransferOptions, TransferOutcome, TransferPhase, TransferProgress,
};
pub use self::error::{EngineError, Result};
pub use self::metainfo::{Info, Metainfo, TransferJob};

mod command;
mod descriptor;
mod engine;
mod error;
mod metainfo;
