use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use edgescan::{dump_store, DumpConfig};

/// Print follower/followed edges from a store, one `<follower> <followed>` line each.
///
/// Behavior is tuned with EDGESCAN_STRATEGY (value|key|join), EDGESCAN_INCLUDE_DELETED,
/// EDGESCAN_DANGLING (skip|abort) and EDGESCAN_STRICT. Logs go to stderr, filtered by RUST_LOG.
#[derive(Parser)]
#[command(name = "edgescan", version, about)]
struct Cli {
    /// Store directory
    store: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("edgescan: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = DumpConfig::from_env()?;
    let stdout = io::stdout().lock();
    dump_store(&cli.store, &config, stdout)
        .with_context(|| format!("dumping edges from {}", cli.store.display()))?;
    Ok(())
}
