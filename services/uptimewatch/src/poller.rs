//! Poll scheduling, response classification, and backoff
//!
//! The scheduler fires an immediate poll, then re-polls on a steady cadence.
//! A 429 replaces the next cadence delay with the server's `Retry-After`
//! hint; a 403 ends the session after a short grace delay so the embedder can
//! rebuild a fresh one; anything else failing leaves the cadence untouched
//! and only degrades the display.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::clock::ClockState;
use crate::config::Config;
use crate::error::WatchError;
use crate::io::{HttpClient, HttpResponse, TimeSource};
use crate::status::{parse_status_body, StatusSample};
use crate::view::View;

/// Backoff applied to a 429 without a `Retry-After` header
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Grace delay between a forbidden response and the session restart
pub const RELOAD_DELAY: Duration = Duration::from_secs(3);

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// What a single poll attempt resolved to
#[derive(Debug)]
pub enum Disposition {
    Sample(StatusSample),
    RateLimited { retry_after: Duration },
    Forbidden,
    Failed(WatchError),
}

/// Scheduler phase after handling a poll; determines the next delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Active,
    RateLimited { retry_after: Duration },
    Suspended,
}

/// How a polling session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The cancellation token fired
    Shutdown,
    /// Forbidden response; the embedder should rebuild a fresh session
    Restart,
}

/// Classify an HTTP outcome into a scheduling disposition
pub fn classify(result: crate::Result<HttpResponse>) -> Disposition {
    match result {
        Err(e) => Disposition::Failed(e),
        Ok(r) if r.status == 429 => Disposition::RateLimited {
            retry_after: r
                .retry_after_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_AFTER),
        },
        Ok(r) if r.status == 403 => Disposition::Forbidden,
        Ok(r) if !(200..300).contains(&r.status) => Disposition::Failed(WatchError::Status(r.status)),
        Ok(r) => match parse_status_body(&r.body) {
            Ok(sample) => Disposition::Sample(sample),
            Err(e) => Disposition::Failed(e),
        },
    }
}

/// Drives the poll cadence and the once-per-second display tick
pub struct PollScheduler {
    http: Arc<dyn HttpClient>,
    time: Arc<dyn TimeSource>,
    clock: Arc<RwLock<ClockState>>,
    view: Arc<RwLock<View>>,
    status_url: String,
    interval: Duration,
    cancel: CancellationToken,
    tick_cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for PollScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollScheduler")
            .field("status_url", &self.status_url)
            .field("interval", &self.interval)
            .field("ticking", &self.tick_cancel.is_some())
            .finish()
    }
}

impl PollScheduler {
    pub fn new(
        http: Arc<dyn HttpClient>,
        time: Arc<dyn TimeSource>,
        clock: Arc<RwLock<ClockState>>,
        view: Arc<RwLock<View>>,
        config: &Config,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            http,
            time,
            clock,
            view,
            status_url: config.status_url(),
            interval: Duration::from_secs(config.poll_interval_seconds),
            cancel,
            tick_cancel: None,
        }
    }

    /// Poll until shutdown or until a forbidden response ends the session.
    ///
    /// The first poll fires immediately; each iteration owns exactly one
    /// pending delay, so duplicate cadence timers cannot stack across
    /// rate-limit transitions.
    pub async fn run(mut self) -> SessionEnd {
        loop {
            let disposition = classify(self.http.get(&self.status_url).await);
            let phase = self.transition(disposition).await;
            let delay = match phase {
                PollPhase::Active => self.interval,
                PollPhase::RateLimited { retry_after } => retry_after,
                PollPhase::Suspended => {
                    tokio::select! {
                        _ = tokio::time::sleep(RELOAD_DELAY) => {}
                        _ = self.cancel.cancelled() => return SessionEnd::Shutdown,
                    }
                    self.view.read().await.reload();
                    return SessionEnd::Restart;
                }
            };
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.cancel.cancelled() => {
                    self.stop_ticker();
                    return SessionEnd::Shutdown;
                }
            }
        }
    }

    async fn transition(&mut self, disposition: Disposition) -> PollPhase {
        match disposition {
            Disposition::Sample(sample) => {
                self.accept(sample).await;
                PollPhase::Active
            }
            Disposition::RateLimited { retry_after } => {
                tracing::warn!("Rate limited, retrying in {:?}", retry_after);
                self.stop_ticker();
                self.view.write().await.rate_limited();
                PollPhase::RateLimited { retry_after }
            }
            Disposition::Forbidden => {
                tracing::warn!("Access forbidden, restarting session in {:?}", RELOAD_DELAY);
                self.stop_ticker();
                self.view.read().await.forbidden();
                PollPhase::Suspended
            }
            Disposition::Failed(err) => {
                tracing::debug!("Poll failed: {}", err);
                self.note_failure().await;
                PollPhase::Active
            }
        }
    }

    async fn accept(&mut self, sample: StatusSample) {
        let now_ms = self.time.now_ms();
        let shown = self.clock.write().await.reconcile(&sample, now_ms);
        {
            let mut view = self.view.write().await;
            view.normal();
            view.show_uptime(shown);
            view.show_latency_ms(sample.latency_ms);
        }
        self.ensure_ticker();
    }

    async fn note_failure(&mut self) {
        self.view.write().await.latency_timed_out();
        let now_ms = self.time.now_ms();
        if self.clock.read().await.is_stale(now_ms) {
            tracing::warn!("No accepted sample for over {}ms, invalidating clock", crate::clock::STALE_AFTER_MS);
            self.stop_ticker();
            self.clock.write().await.invalidate();
            self.view.write().await.timed_out();
        }
    }

    /// Start the tick task unless one is already running
    fn ensure_ticker(&mut self) {
        if self.tick_cancel.is_some() {
            return;
        }
        let cancel = self.cancel.child_token();
        self.tick_cancel = Some(cancel.clone());

        let clock = Arc::clone(&self.clock);
        let view = Arc::clone(&self.view);
        let time = Arc::clone(&self.time);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(TICK_PERIOD) => {}
                    _ = cancel.cancelled() => break,
                }
                // A tick and its cancellation can be woken in the same
                // instant; re-check liveness and the clock before rendering.
                if cancel.is_cancelled() {
                    break;
                }
                let shown = clock.read().await.tick(time.now_ms());
                let Some(breakdown) = shown else { continue };
                if cancel.is_cancelled() {
                    break;
                }
                view.write().await.show_uptime(breakdown);
            }
        });
    }

    fn stop_ticker(&mut self) {
        if let Some(cancel) = self.tick_cancel.take() {
            cancel.cancel();
        }
    }
}
