use anomaly_core::{AnomalyError, Result};
use serde_json::Value;

/// One update cycle's worth of input, as seen by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// The payload carried a number.  It may still be non-finite (`nan`, `inf`);
    /// the detector is the one that rejects those.
    Value(f64),
    /// Nothing usable this cycle.  Carries the reason for logging.
    Missing(String),
}

/// Turn a raw payload into a [`Reading`].
///
/// Accepts a bare number (`42.5`), a JSON string holding a number
/// (`"42.5"`), or a JSON object whose `field` holds either of those.
/// Anything else is [`Reading::Missing`].
pub fn extract_reading(payload: &str, field: &str) -> Reading {
    match extract_value(payload, field) {
        Ok(v) => Reading::Value(v),
        Err(e) => Reading::Missing(e.to_string()),
    }
}

/// Like [`extract_reading`] but reports why nothing could be extracted.
pub fn extract_value(payload: &str, field: &str) -> Result<f64> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(AnomalyError::Feed("empty payload".into()));
    }
    if let Ok(v) = payload.parse::<f64>() {
        return Ok(v);
    }

    let json: Value = serde_json::from_str(payload)
        .map_err(|_| AnomalyError::Feed(format!("not a number: {payload:?}")))?;

    match json {
        Value::Object(mut map) => match map.remove(field) {
            Some(inner) => numeric(inner, field),
            None => Err(AnomalyError::Feed(format!("field '{field}' missing"))),
        },
        other => numeric(other, field),
    }
}

fn numeric(value: Value, field: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AnomalyError::Feed(format!("'{field}' out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| AnomalyError::Feed(format!("'{field}' is not numeric: {s:?}"))),
        Value::Null => Err(AnomalyError::Feed(format!("'{field}' is null"))),
        other => Err(AnomalyError::Feed(format!("'{field}' is not numeric: {other}"))),
    }
}
