use serde::Serialize;
use std::fmt;

/// Summary statistics and verdict for one ingested sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Arithmetic mean of the window, including the sample just ingested.
    pub mean: f64,
    /// Sample standard deviation of the window.  Always `0.0` while warming up.
    pub stddev: f64,
    /// Whether the sample deviates from `mean` by more than `threshold × stddev`.
    pub is_anomaly: bool,
}

impl ClassificationResult {
    #[must_use]
    pub fn status(&self) -> Status {
        if self.is_anomaly {
            Status::Anomaly
        } else {
            Status::Normal
        }
    }
}

/// Two-valued status label shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Status {
    #[default]
    Normal,
    Anomaly,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Normal  => "Normal",
            Status::Anomaly => "Anomaly",
        })
    }
}

/// Detector lifecycle.  `WarmingUp → Active` happens once and never reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fewer than `min_samples` observations seen; every sample is `Normal`.
    WarmingUp,
    /// The deviation test is applied to every sample.
    Active,
}
