use crate::error::{AnomalyError, Result};
use crate::result::{ClassificationResult, Phase, Status};
use crate::window::SampleWindow;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Construction parameters for [`WindowedDeviationDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum number of recent samples kept in the window.
    pub capacity: usize,
    /// Multiple of the window standard deviation a sample must exceed to be an anomaly.
    pub threshold: f64,
    /// Window length at which the deviation test starts being applied.
    pub min_samples: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            capacity:    10,
            threshold:   2.0,
            min_samples: 3,
        }
    }
}

impl DetectorConfig {
    /// Reject parameter combinations that cannot produce a working detector.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 1 {
            return Err(AnomalyError::InvalidConfig("capacity must be at least 1".into()));
        }
        if self.min_samples < 2 {
            return Err(AnomalyError::InvalidConfig(format!(
                "min_samples must be at least 2, got {}",
                self.min_samples
            )));
        }
        if self.capacity < self.min_samples {
            return Err(AnomalyError::InvalidConfig(format!(
                "capacity ({}) is smaller than min_samples ({})",
                self.capacity, self.min_samples
            )));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(AnomalyError::InvalidConfig(format!(
                "threshold must be a positive finite number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Online z-score detector over a bounded window of recent samples.
///
/// Each call to [`ingest`](Self::ingest) records one observation and
/// classifies it against the window that now contains it.  Until the window
/// holds `min_samples` values every observation is classified `Normal`.
///
/// The detector does no locking; callers sharing one across tasks must
/// serialize access themselves.
#[derive(Debug, Clone)]
pub struct WindowedDeviationDetector {
    config: DetectorConfig,
    window: SampleWindow,
    last:   Option<ClassificationResult>,
}

impl WindowedDeviationDetector {
    /// Build a detector with an empty window.
    ///
    /// Fails with [`AnomalyError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        let window = SampleWindow::new(config.capacity);
        Ok(Self {
            config,
            window,
            last: None,
        })
    }

    /// Record `value` and classify it against the updated window.
    ///
    /// Non-finite input yields [`AnomalyError::InvalidSample`] and leaves the
    /// detector untouched, so [`status`](Self::status) keeps reporting the
    /// previous verdict.  Every successful call mutates the window; feeding
    /// the same observation twice counts it twice.
    pub fn ingest(&mut self, value: f64) -> Result<ClassificationResult> {
        if !value.is_finite() {
            return Err(AnomalyError::InvalidSample(value));
        }

        let was_warming_up = self.phase() == Phase::WarmingUp;
        self.window.push(value);

        let result = if self.window.len() < self.config.min_samples {
            ClassificationResult {
                mean:       self.window.mean(),
                stddev:     0.0,
                is_anomaly: false,
            }
        } else {
            if was_warming_up {
                debug!(
                    samples = self.window.len(),
                    "detector warmed up; deviation test now active"
                );
            }
            self.classify(value)
        };

        trace!(
            value,
            mean = result.mean,
            stddev = result.stddev,
            is_anomaly = result.is_anomaly,
            "sample classified"
        );

        self.last = Some(result);
        Ok(result)
    }

    /// Apply the deviation test to `value`, which is already in the window.
    fn classify(&self, value: f64) -> ClassificationResult {
        // A constant window has exactly zero dispersion; skip the arithmetic
        // so rounding in the mean cannot fabricate a tiny stddev.
        let (scale, mean, stddev) = if self.window.is_constant() {
            (1.0, value, 0.0)
        } else {
            self.window.scaled_moments()
        };

        let deviation = (value / scale - mean).abs();

        ClassificationResult {
            mean:       mean * scale,
            stddev:     stddev * scale,
            is_anomaly: exceeds(deviation, stddev, self.config.threshold),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Current lifecycle phase, derived from the window length.
    pub fn phase(&self) -> Phase {
        if self.window.len() >= self.config.min_samples {
            Phase::Active
        } else {
            Phase::WarmingUp
        }
    }

    /// Number of samples currently held (never more than `capacity`).
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Result of the most recent successful [`ingest`](Self::ingest), if any.
    pub fn last_result(&self) -> Option<&ClassificationResult> {
        self.last.as_ref()
    }

    /// Status of the most recent successful ingest; `Normal` before the first.
    pub fn status(&self) -> Status {
        self.last.map(|r| r.status()).unwrap_or_default()
    }
}

impl Default for WindowedDeviationDetector {
    fn default() -> Self {
        let config = DetectorConfig::default();
        Self {
            window: SampleWindow::new(config.capacity),
            config,
            last: None,
        }
    }
}

/// Deviation test.  With zero dispersion any deviation at all is anomalous.
fn exceeds(deviation: f64, stddev: f64, threshold: f64) -> bool {
    if stddev == 0.0 {
        deviation > 0.0
    } else {
        deviation > threshold * stddev
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn config(capacity: usize, min_samples: usize, threshold: f64) -> DetectorConfig {
        DetectorConfig {
            capacity,
            threshold,
            min_samples,
        }
    }

    proptest! {
        #[test]
        fn history_length_is_bounded(
            data in proptest::collection::vec(-1e6_f64..1e6, 0..=40),
            capacity in 2_usize..=12,
        ) {
            let mut d = WindowedDeviationDetector::new(config(capacity, 2, 2.0)).unwrap();
            for (i, &x) in data.iter().enumerate() {
                d.ingest(x).unwrap();
                prop_assert_eq!(d.len(), (i + 1).min(capacity));
            }
        }

        #[test]
        fn warm_up_is_always_normal(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..=20),
            min_samples in 2_usize..=8,
        ) {
            let mut d = WindowedDeviationDetector::new(config(10, min_samples, 2.0)).unwrap();
            for &x in data.iter().take(min_samples - 1) {
                let r = d.ingest(x).unwrap();
                prop_assert!(!r.is_anomaly);
                prop_assert_eq!(r.stddev, 0.0);
            }
        }

        #[test]
        fn raising_threshold_never_creates_anomalies(
            data in proptest::collection::vec(-1e3_f64..1e3, 1..=40),
            low in 0.1_f64..4.0,
            extra in 0.0_f64..4.0,
        ) {
            let mut loose = WindowedDeviationDetector::new(config(10, 3, low)).unwrap();
            let mut strict = WindowedDeviationDetector::new(config(10, 3, low + extra)).unwrap();
            for &x in &data {
                let a = loose.ingest(x).unwrap();
                let b = strict.ingest(x).unwrap();
                prop_assert!(!b.is_anomaly || a.is_anomaly, "x = {x}");
            }
        }

        #[test]
        fn evicted_sample_has_no_influence(
            first_a in -1e3_f64..1e3,
            first_b in -1e3_f64..1e3,
            rest in proptest::collection::vec(-1e3_f64..1e3, 5),
            tail in proptest::collection::vec(-1e3_f64..1e3, 0..=5),
        ) {
            let mut a = WindowedDeviationDetector::new(config(5, 3, 2.0)).unwrap();
            let mut b = WindowedDeviationDetector::new(config(5, 3, 2.0)).unwrap();
            a.ingest(first_a).unwrap();
            b.ingest(first_b).unwrap();
            for &x in &rest[..4] {
                a.ingest(x).unwrap();
                b.ingest(x).unwrap();
            }
            // From the sixth ingest on, both windows hold identical samples.
            for &x in rest[4..].iter().chain(&tail) {
                prop_assert_eq!(a.ingest(x).unwrap(), b.ingest(x).unwrap());
            }
        }
    }
}
