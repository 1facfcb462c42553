use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::{debug, info};

use crate::engine::{
    TransferEngine, TransferOptions, TransferOutcome, TransferPhase, TransferProgress,
};
use crate::error::{EngineError, Result};
use crate::metainfo::TransferJob;

/// Transfer engine backed by an external torrent client process.
///
/// The program is invoked as `program <torrent-file> <dest-dir>
/// [--verbose]` and must exit 0 once the payload named by the metainfo is
/// fully written inside `<dest-dir>`. The descriptor is handed over as a
/// temporary `.torrent` file that is removed after the process exits.
pub struct CommandEngine {
    program: PathBuf,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve `name` on PATH.
    pub fn locate(name: &str) -> Result<Self> {
        let program = which::which(name)
            .map_err(|_| EngineError::ProgramNotFound(name.to_owned()))?;
        Ok(Self { program })
    }

    pub fn program(&self) -> &Path { &self.program }
}

impl TransferEngine for CommandEngine {
    async fn download(
        &self,
        job: &TransferJob,
        dest_dir: &Path,
        options: &TransferOptions,
    ) -> Result<TransferOutcome> {
        let total_bytes = job.metainfo().info.length;
        options.report(TransferProgress {
            phase: TransferPhase::Starting,
            bytes_transferred: 0,
            total_bytes,
        });

        // Hand the descriptor over by path; the buffer is binary and sized
        // explicitly, so write the whole slice, never a C string.
        let mut torrent_file = tempfile::Builder::new()
            .prefix(".h5cache-")
            .suffix(".torrent")
            .tempfile_in(dest_dir)?;
        torrent_file.write_all(job.descriptor().as_bytes())?;
        torrent_file.flush()?;

        if let Some(hash) = job.metainfo().info_hash() {
            debug!(info_hash = %hex::encode(hash), payload = job.payload_name(), "starting transfer");
        }

        let mut command = tokio::process::Command::new(&self.program);
        command.arg(torrent_file.path()).arg(dest_dir);
        // Cancelling the download future must also stop the process, or a
        // timed-out engine keeps writing into the shard behind our back.
        command.kill_on_drop(true);
        if options.verbose {
            command.arg("--verbose");
        } else {
            command.stdout(Stdio::null());
        }

        let status = command.status().await?;
        if !status.success() {
            return Err(EngineError::Engine {
                status: status.code().unwrap_or(-1),
            });
        }

        let payload = dest_dir.join(job.payload_name());
        let bytes_transferred = match std::fs::metadata(&payload) {
            Ok(meta) => Some(meta.len()),
            Err(_) => return Err(EngineError::MissingPayload(payload)),
        };

        options.report(TransferProgress {
            phase: TransferPhase::Completed,
            bytes_transferred: bytes_transferred.unwrap_or(0),
            total_bytes,
        });
        info!(payload = %payload.display(), "transfer complete");

        Ok(TransferOutcome {
            payload,
            bytes_transferred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Descriptor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::tempdir;

    fn job() -> TransferJob {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"d4:info");
        bytes.extend_from_slice(b"d6:lengthi7e4:name11:cache_aa_bb12:piece lengthi16384e6:pieces20:");
        bytes.extend_from_slice(&[0u8; 20]);
        bytes.extend_from_slice(b"ee");
        TransferJob::decode(Descriptor::new(bytes)).unwrap()
    }

    #[cfg(unix)]
    fn script(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("engine.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_program_and_reports_payload() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        // Engine contract stand-in: materialize the payload under the
        // metainfo name from the handed-over torrent file.
        let engine = CommandEngine::new(script(dir.path(), r#"cp "$1" "$2/cache_aa_bb""#));

        let progress_events = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&progress_events);
        let options = TransferOptions::default()
            .on_progress(Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        let outcome = engine.download(&job(), &dest, &options).await.unwrap();

        assert_eq!(outcome.payload, dest.join("cache_aa_bb"));
        assert_eq!(
            std::fs::read(&outcome.payload).unwrap(),
            job().descriptor().as_bytes()
        );
        assert!(progress_events.load(Ordering::SeqCst) >= 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_engine_failure() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        let engine = CommandEngine::new(script(dir.path(), "exit 3"));
        let err = engine
            .download(&job(), &dest, &TransferOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Engine { status: 3 }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_payload_is_an_error() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        let engine = CommandEngine::new(script(dir.path(), "true"));
        let err = engine
            .download(&job(), &dest, &TransferOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingPayload(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn torrent_file_is_cleaned_up() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        let engine = CommandEngine::new(script(dir.path(), r#"cp "$1" "$2/cache_aa_bb""#));
        engine
            .download(&job(), &dest, &TransferOptions::default())
            .await
            .unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(&dest)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "torrent"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn cancelled_download_kills_the_engine_process() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("dest");
        std::fs::create_dir(&dest).unwrap();

        // The engine would drop its marker after one second; cancelling the
        // download must stop it before then.
        let engine = CommandEngine::new(script(dir.path(), r#"sleep 1; touch "$2/marker""#));

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            engine.download(&job(), &dest, &TransferOptions::default()),
        )
        .await;
        assert!(result.is_err());

        tokio::time::sleep(std::time::Duration::from_millis(1200)).await;
        assert!(
            !dest.join("marker").exists(),
            "engine process outlived its cancelled download"
        );
    }

    #[test]
    fn locate_unknown_program_fails() {
        assert!(matches!(
            CommandEngine::locate("h5cache-no-such-engine"),
            Err(EngineError::ProgramNotFound(_))
        ));
    }
}
