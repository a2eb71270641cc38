//! Streaming anomaly detection over a bounded window of scalar samples.

pub mod detector;
pub mod error;
pub mod result;
mod window;

pub use detector::{DetectorConfig, WindowedDeviationDetector};
pub use error::{AnomalyError, Result};
pub use result::{ClassificationResult, Phase, Status};
