//! Parsing of the `/status` endpoint response body

use serde::Deserialize;

use crate::error::WatchError;

/// One successful response from the status endpoint.
///
/// `uptime` arrives as a whole count of seconds, either as a JSON number or
/// as a numeric string (the live endpoint emits strings). `latency` is in
/// milliseconds and arrives in both shapes as well.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSample {
    pub uptime_seconds: u64,
    pub latency_ms: f64,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    uptime: NumberOrString,
    latency: NumberOrString,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(n) => Some(*n),
            NumberOrString::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Parse a status body into a [`StatusSample`]
pub fn parse_status_body(body: &str) -> crate::Result<StatusSample> {
    let raw: RawStatus = serde_json::from_str(body)?;

    let uptime = raw
        .uptime
        .as_f64()
        .ok_or_else(|| WatchError::Parse("uptime is not numeric".to_string()))?;
    if uptime < 0.0 || uptime.fract() != 0.0 {
        return Err(WatchError::Parse(format!(
            "uptime must be a non-negative whole number of seconds, got {uptime}"
        )));
    }

    let latency = raw
        .latency
        .as_f64()
        .ok_or_else(|| WatchError::Parse("latency is not numeric".to_string()))?;
    if latency < 0.0 {
        return Err(WatchError::Parse(format!(
            "latency must be non-negative, got {latency}"
        )));
    }

    Ok(StatusSample {
        uptime_seconds: uptime as u64,
        latency_ms: latency,
    })
}
