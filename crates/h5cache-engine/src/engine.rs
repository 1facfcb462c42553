use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::metainfo::TransferJob;

/// Phases of a payload transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPhase {
    /// Engine is starting up and contacting peers.
    #[default]
    Starting,

    /// Payload pieces are arriving.
    Transferring,

    /// Payload fully received and verified by the engine.
    Completed,
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferPhase::Starting => write!(f, "Starting"),
            TransferPhase::Transferring => write!(f, "Transferring"),
            TransferPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// A progress snapshot emitted by the engine's own scheduling.
///
/// Advisory only; correctness never depends on progress events, and an
/// engine that emits none is conforming.
#[derive(Debug, Clone, Copy)]
pub struct TransferProgress {
    pub phase: TransferPhase,
    pub bytes_transferred: u64,
    pub total_bytes: Option<u64>,
}

impl TransferProgress {
    /// Percent complete, when the payload size is known.
    pub fn percentage(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => {
                Some(self.bytes_transferred as f64 / total as f64 * 100.0)
            }
            _ => None,
        }
    }
}

/// Options for one engine invocation.
#[derive(Clone, Default)]
pub struct TransferOptions {
    /// Pass verbosity through to the engine (periodic rate/percent output).
    pub verbose: bool,

    /// Callback invoked by the engine at its own cadence; the caller never
    /// polls.
    pub on_progress: Option<Arc<dyn Fn(&TransferProgress) + Send + Sync>>,
}

impl fmt::Debug for TransferOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferOptions")
            .field("verbose", &self.verbose)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl TransferOptions {
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: Arc<dyn Fn(&TransferProgress) + Send + Sync>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Invoke the progress callback, if any. For engine implementations.
    pub fn report(&self, progress: TransferProgress) {
        if let Some(callback) = &self.on_progress {
            callback(&progress);
        }
    }
}

/// Where the engine left the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Path of the completed payload inside the destination directory.
    pub payload: PathBuf,
    pub bytes_transferred: Option<u64>,
}

/// The peer-to-peer transfer subsystem, as a black box.
///
/// Contract: given a decoded job and a destination directory, drive the
/// transfer until the payload is fully received at a predictable name
/// inside the destination (the job's `payload_name`), or fail. The engine
/// borrows the job only for the duration of the call and must not write
/// anything outside the destination directory.
pub trait TransferEngine: Send + Sync {
    fn download(
        &self,
        job: &TransferJob,
        dest_dir: &Path,
        options: &TransferOptions,
    ) -> impl Future<Output = Result<TransferOutcome>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_needs_a_total() {
        let progress = TransferProgress {
            phase: TransferPhase::Transferring,
            bytes_transferred: 50,
            total_bytes: None,
        };
        assert_eq!(progress.percentage(), None);

        let progress = TransferProgress {
            total_bytes: Some(200),
            ..progress
        };
        assert_eq!(progress.percentage(), Some(25.0));
    }
}
