//! h5cache CLI entry point.
//!
//! `h5cache <hash> [cache-dir]` resolves a content hash into the local
//! cache, fetching over the transfer engine on a miss. Success is exit 0
//! whether the payload was already present or fetched now; failures map to
//! per-stage exit codes (see `PipelineError::exit_code`).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use h5cache::{CACHE_ROOT_ENV, Config, DEFAULT_BASE_URL, Outcome, Pipeline, PipelineError};
use h5cache_engine::CommandEngine;
use h5cache_fetch::{FetchOptions, ReqwestClient};

/// Resolve a content hash to a locally cached file.
///
/// Probes the hash-sharded cache first; on a miss, fetches the torrent
/// descriptor from the object store and drives an external transfer engine
/// to populate the cache atomically.
#[derive(Parser, Debug)]
#[command(name = "h5cache", version, about, long_about = None)]
struct Cli {
    /// 40-character lowercase hex content hash.
    hash: String,

    /// Cache root directory; defaults to $HDF5CACHE.
    cache_dir: Option<PathBuf>,

    /// Object store endpoint serving descriptors.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// External transfer engine, invoked as `ENGINE <torrent> <dest-dir>`.
    #[arg(long, default_value = "h5torrent", value_name = "PROGRAM")]
    engine: PathBuf,

    /// Abort the transfer after this many seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Retries for the descriptor fetch.
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Increase log verbosity (-v, -vv); also passed to the engine.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(outcome) => {
            println!("{}", outcome.path().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome, PipelineError> {
    let cache_root = match cli.cache_dir {
        Some(dir) => dir,
        None => std::env::var_os(CACHE_ROOT_ENV)
            .map(PathBuf::from)
            .ok_or(PipelineError::CacheRootUnset)?,
    };

    let config = Config::new(cache_root)
        .base_url(cli.base_url)
        .verbose(cli.verbose > 0)
        .fetch(FetchOptions::default().max_retries(cli.retries))
        .transfer_timeout(cli.timeout.map(Duration::from_secs));

    let client = ReqwestClient::new()?;
    let engine = CommandEngine::new(cli.engine);

    Pipeline::new(&config, client, engine).run(&cli.hash).await
}
