pub mod schema;
pub mod watcher;

pub use schema::{AppConfig, FeedConfig, OutputConfig, OutputFormat};
pub use watcher::ConfigWatcher;

use anomaly_core::{AnomalyError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `AppConfig::default()` if
/// the file doesn't exist so the detector always has sensible defaults.
///
/// The `[detector]` table is validated here, so a config that loads is one
/// a detector can be built from.
pub fn load(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(AppConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| AnomalyError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: AppConfig =
        toml::from_str(&raw).map_err(|e| AnomalyError::Config(format!("TOML parse error: {e}")))?;
    config.detector.validate()?;
    Ok(config)
}

/// Return the default config path.
///
/// `$ANOMALY_CONFIG` wins outright; otherwise `$XDG_CONFIG_HOME` is honoured,
/// falling back to `~/.config`.
pub fn default_path() -> PathBuf {
    if let Ok(explicit) = std::env::var("ANOMALY_CONFIG") {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("anomaly").join("anomaly.toml")
}
