//! uptimewatch - client-side status poller
//!
//! Polls a remote `/status` endpoint on a steady cadence, reconciles the
//! reported uptime against a locally ticking clock, and renders a
//! continuously updating uptime counter and latency reading through a
//! pluggable sink. Handles rate limiting, forbidden access, transient
//! failures with a staleness cutoff, and live switching of the displayed
//! days label.

pub mod clock;
pub mod config;
pub mod error;
pub mod io;
pub mod locale;
pub mod poller;
pub mod status;
pub mod view;

#[cfg(test)]
mod testutil;

pub use config::{load_config, Config};
pub use error::{Result, WatchError};

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;

use crate::clock::ClockState;
use crate::io::{HttpClient, ReqwestHttpClient, SystemTimeSource, TimeSource};
use crate::poller::{PollScheduler, SessionEnd};
use crate::view::{RenderSink, TerminalSink, View};

/// Run the poller with production I/O until the cancellation token fires.
///
/// `label_rx` carries the active days label; sending a new value switches the
/// rendered label live.
pub async fn run(
    config: Config,
    cancel: CancellationToken,
    label_rx: watch::Receiver<String>,
) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::default());
    let time: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
    let sink: Arc<dyn RenderSink> = Arc::new(TerminalSink);
    run_sessions(config, http, time, sink, cancel, label_rx).await
}

/// Run polling sessions with injected collaborators.
///
/// A forbidden response ends the current session and starts a fresh one with
/// a clean clock, the process-level equivalent of the original page reload.
pub async fn run_sessions(
    config: Config,
    http: Arc<dyn HttpClient>,
    time: Arc<dyn TimeSource>,
    sink: Arc<dyn RenderSink>,
    cancel: CancellationToken,
    label_rx: watch::Receiver<String>,
) -> Result<()> {
    loop {
        let session = cancel.child_token();
        let view = Arc::new(RwLock::new(View::new(
            Arc::clone(&sink),
            label_rx.borrow().clone(),
        )));
        let clock = Arc::new(RwLock::new(ClockState::new()));

        tokio::spawn(apply_label_changes(
            label_rx.clone(),
            Arc::clone(&view),
            session.clone(),
        ));

        let scheduler = PollScheduler::new(
            Arc::clone(&http),
            Arc::clone(&time),
            clock,
            view,
            &config,
            session.clone(),
        );
        let end = scheduler.run().await;
        session.cancel();
        match end {
            SessionEnd::Shutdown => {
                tracing::info!("Poller stopped");
                return Ok(());
            }
            SessionEnd::Restart => {
                tracing::info!("Starting a fresh polling session");
            }
        }
    }
}

/// Forward days-label changes to the view for the lifetime of one session
async fn apply_label_changes(
    mut label_rx: watch::Receiver<String>,
    view: Arc<RwLock<View>>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = label_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let label = label_rx.borrow_and_update().clone();
                tracing::debug!("Switching days label to '{}'", label);
                view.write().await.set_days_label(label);
            }
        }
    }
}
