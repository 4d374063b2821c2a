//! Shared test doubles for scheduler and session tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::io::{HttpClient, HttpResponse, TimeSource};

/// Wall-clock base so epoch arithmetic never saturates at zero in tests
pub const BASE_MS: u64 = 1_000_000_000;

/// Time source driven by tokio's (pausable) clock
#[derive(Debug)]
pub struct PausedTime {
    start: tokio::time::Instant,
}

impl PausedTime {
    pub fn new() -> Self {
        Self {
            start: tokio::time::Instant::now(),
        }
    }
}

impl TimeSource for PausedTime {
    fn now_ms(&self) -> u64 {
        BASE_MS + self.start.elapsed().as_millis() as u64
    }
}

/// One scripted response from the fake status endpoint
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// 200 with the given uptime seconds and latency ms, in the string
    /// shape the live endpoint emits
    Ok(u64, f64),
    RateLimited(Option<u64>),
    Forbidden,
    Status(u16),
    NetworkError,
}

/// HTTP client that replays a script and records when each call arrived
#[derive(Debug)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<ScriptStep>>,
    calls: Mutex<Vec<tokio::time::Duration>>,
    started: tokio::time::Instant,
}

impl ScriptedClient {
    pub fn new(script: Vec<ScriptStep>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
            started: tokio::time::Instant::now(),
        })
    }

    /// Milliseconds from construction to each GET, in call order
    pub fn call_offsets_ms(&self) -> Vec<u64> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.as_millis() as u64)
            .collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get(&self, _url: &str) -> crate::Result<HttpResponse> {
        self.calls.lock().unwrap().push(self.started.elapsed());
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted");
        match step {
            ScriptStep::Ok(uptime_seconds, latency_ms) => Ok(HttpResponse {
                status: 200,
                body: format!(r#"{{"uptime": "{uptime_seconds}", "latency": "{latency_ms}"}}"#),
                retry_after_secs: None,
            }),
            ScriptStep::RateLimited(retry_after_secs) => Ok(HttpResponse {
                status: 429,
                body: String::new(),
                retry_after_secs,
            }),
            ScriptStep::Forbidden => Ok(HttpResponse {
                status: 403,
                body: String::new(),
                retry_after_secs: None,
            }),
            ScriptStep::Status(status) => Ok(HttpResponse {
                status,
                body: String::new(),
                retry_after_secs: None,
            }),
            ScriptStep::NetworkError => Err(crate::WatchError::Network(
                "connection refused".to_string(),
            )),
        }
    }
}
