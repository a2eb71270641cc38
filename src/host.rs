use anomaly_config::{AppConfig, FeedConfig, OutputFormat};
use anomaly_core::{AnomalyError, Result, WindowedDeviationDetector};
use anomaly_feed::Reading;
use serde_json::json;
use tracing::{info, warn};

/// One detector plus the host policy around it: a single ingest per update
/// cycle, and the last status repeated whenever a cycle has no usable reading.
pub struct Host {
    detector: WindowedDeviationDetector,
    format:   OutputFormat,
    /// `[feed]` table as last seen; the running feed task is bound at startup.
    feed:     FeedConfig,
}

impl Host {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            detector: WindowedDeviationDetector::new(config.detector.clone())?,
            format:   config.output.format,
            feed:     config.feed.clone(),
        })
    }

    #[cfg(test)]
    pub fn detector(&self) -> &WindowedDeviationDetector {
        &self.detector
    }

    /// Run one update cycle and return the line to display.
    pub fn cycle(&mut self, reading: Reading) -> String {
        let fresh = match reading {
            Reading::Value(v) => match self.detector.ingest(v) {
                Ok(_) => true,
                Err(AnomalyError::InvalidSample(x)) => {
                    warn!("Ignoring non-finite reading {x}; keeping status {}", self.detector.status());
                    false
                }
                Err(e) => {
                    warn!("Ingest failed: {e}");
                    false
                }
            },
            Reading::Missing(reason) => {
                warn!("No usable reading this cycle ({reason}); keeping status {}", self.detector.status());
                false
            }
        };
        self.render(fresh)
    }

    fn render(&self, fresh: bool) -> String {
        let status = self.detector.status();
        match self.format {
            OutputFormat::Label => status.to_string(),
            OutputFormat::Json => {
                let last = self.detector.last_result();
                json!({
                    "status":     status,
                    "mean":       last.map(|r| r.mean),
                    "stddev":     last.map(|r| r.stddev),
                    "is_anomaly": last.map(|r| r.is_anomaly).unwrap_or(false),
                    "phase":      self.detector.phase(),
                    "held":       !fresh,
                })
                .to_string()
            }
        }
    }

    /// Apply a reloaded config.
    ///
    /// A changed `[detector]` table swaps in a fresh detector, which restarts
    /// the window.  Output format changes apply from the next cycle.  Returns
    /// `true` when `[feed]` differs from the last applied config, which only a
    /// restart can pick up.
    pub fn reconfigure(&mut self, config: &AppConfig) -> Result<bool> {
        if &config.detector != self.detector.config() {
            self.detector = WindowedDeviationDetector::new(config.detector.clone())?;
            info!(
                capacity = config.detector.capacity,
                threshold = config.detector.threshold,
                min_samples = config.detector.min_samples,
                "Detector rebuilt from reloaded config; window restarted"
            );
        }
        self.format = config.output.format;

        let feed_edited = config.feed != self.feed;
        if feed_edited {
            warn!("[feed] changes take effect after a restart");
            self.feed = config.feed.clone();
        }
        Ok(feed_edited)
    }
}
