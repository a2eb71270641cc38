use thiserror::Error;

/// Top-level error type used across the entire workspace.
#[derive(Debug, Error)]
pub enum AnomalyError {
    /// Detector parameters that cannot produce a valid detector.
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),

    /// A non-finite value was offered to the detector.  Nothing was recorded.
    #[error("invalid sample: {0} is not a finite number")]
    InvalidSample(f64),

    #[error("config error: {0}")]
    Config(String),

    #[error("feed error: {0}")]
    Feed(String),
}

pub type Result<T, E = AnomalyError> = std::result::Result<T, E>;
