use anomaly_core::DetectorConfig;
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `anomaly.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Window and threshold parameters for the detector.
    pub detector: DetectorConfig,
    /// Where each update cycle's reading comes from.
    pub feed: FeedConfig,
    /// How each cycle's result is reported.
    pub output: OutputConfig,
}

/// Reading extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// JSON field holding the reading when a payload is an object.
    pub field: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            field: "body".to_string(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Per-cycle output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A bare `Normal` / `Anomaly` line.
    #[default]
    Label,
    /// One JSON object with the status and the window statistics.
    Json,
}
