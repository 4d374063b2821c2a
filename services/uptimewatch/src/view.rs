//! Render sink abstraction and display bookkeeping
//!
//! The core never touches a real UI. It emits formatted text and display
//! states through [`RenderSink`]; the view layer decides what to do with
//! them. [`View`] remembers what is currently shown so the days label can be
//! swapped in place when the language changes.

use std::sync::Arc;

use crate::clock::UptimeBreakdown;

/// Overall display condition communicated to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Normal,
    RateLimited,
    TimedOut,
    Forbidden,
}

/// Consumer of rendered output
#[cfg_attr(test, mockall::automock)]
pub trait RenderSink: Send + Sync {
    /// Show the formatted uptime field
    fn uptime(&self, text: &str);

    /// Show the formatted latency field
    fn latency(&self, text: &str);

    /// Signal the overall display state
    fn state(&self, state: DisplayState);

    /// Restart the whole display session (forbidden-access path)
    fn reload(&self);
}

/// Display bookkeeping between the scheduler, the tick task, and the sink
pub struct View {
    sink: Arc<dyn RenderSink>,
    days_label: String,
    shown: Option<UptimeBreakdown>,
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("days_label", &self.days_label)
            .field("shown", &self.shown)
            .finish()
    }
}

impl View {
    pub fn new(sink: Arc<dyn RenderSink>, days_label: String) -> Self {
        Self {
            sink,
            days_label,
            shown: None,
        }
    }

    pub fn show_uptime(&mut self, breakdown: UptimeBreakdown) {
        self.shown = Some(breakdown);
        self.sink.uptime(&breakdown.format(&self.days_label));
    }

    pub fn show_latency_ms(&self, latency_ms: f64) {
        self.sink.latency(&format!("{} ms", latency_ms));
    }

    pub fn normal(&self) {
        self.sink.state(DisplayState::Normal);
    }

    pub fn rate_limited(&mut self) {
        self.shown = None;
        self.sink.uptime("Rate limited");
        self.sink.state(DisplayState::RateLimited);
    }

    /// Latency-only timeout; shown on every failed fetch
    pub fn latency_timed_out(&self) {
        self.sink.latency("Time out");
    }

    /// Full timeout once staleness exceeds the threshold
    pub fn timed_out(&mut self) {
        self.shown = None;
        self.sink.uptime("Time out");
        self.sink.state(DisplayState::TimedOut);
    }

    pub fn forbidden(&self) {
        self.sink.state(DisplayState::Forbidden);
    }

    pub fn reload(&self) {
        self.sink.reload();
    }

    /// Swap the days label for the active language.
    ///
    /// When a day count is currently showing, the uptime field is re-emitted
    /// immediately with the new label rather than waiting for the next tick.
    pub fn set_days_label(&mut self, days_label: String) {
        if days_label == self.days_label {
            return;
        }
        self.days_label = days_label;
        if let Some(breakdown) = self.shown {
            if breakdown.days > 0 {
                self.sink.uptime(&breakdown.format(&self.days_label));
            }
        }
    }
}

/// Sink that prints status lines to stdout, the binary's "page"
#[derive(Debug, Default)]
pub struct TerminalSink;

impl RenderSink for TerminalSink {
    fn uptime(&self, text: &str) {
        println!("uptime : {text}");
    }

    fn latency(&self, text: &str) {
        println!("latency: {text}");
    }

    fn state(&self, state: DisplayState) {
        match state {
            DisplayState::Normal => {}
            DisplayState::RateLimited => tracing::warn!("Rate limited by the status endpoint"),
            DisplayState::TimedOut => tracing::warn!("No fresh sample, display timed out"),
            DisplayState::Forbidden => tracing::error!("Access forbidden"),
        }
    }

    fn reload(&self) {
        tracing::info!("Reloading status session");
    }
}
