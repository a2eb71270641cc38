//! anomaly: classify a stream of numeric readings as `Normal` or `Anomaly`.
//!
//! Reads one payload per line on stdin and prints one status line per cycle.
//!
//! Run with:  `RUST_LOG=info anomaly [path/to/anomaly.toml] < readings.txt`

mod host;

use anomaly_config::{default_path, load as load_config, ConfigWatcher};
use anomaly_feed::spawn_stdin_feed;
use anyhow::{Context, Result};
use host::Host;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging on stderr; stdout carries the status lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("anomaly v{} starting", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_path);

    let config = load_config(&path)
        .with_context(|| format!("loading config from '{}'", path.display()))?;
    let mut host = Host::new(&config)?;

    let mut readings = spawn_stdin_feed(config.feed.field.clone());
    let (watcher, mut reloads) = ConfigWatcher::spawn(&path);

    loop {
        tokio::select! {
            reading = readings.recv() => {
                let Some(reading) = reading else { break };
                let line = host.cycle(reading);
                let mut out = std::io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()?;
            }
            Some(()) = reloads.recv() => {
                match load_config(watcher.path()).and_then(|c| host.reconfigure(&c)) {
                    Ok(_) => info!("Config reloaded from '{}'", watcher.path().display()),
                    Err(e) => warn!("Config reload rejected, keeping current settings: {e}"),
                }
            }
        }
    }

    info!("input closed; shutting down");
    Ok(())
}
