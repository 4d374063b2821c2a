//! Reconciliation of server-reported uptime against the local clock
//!
//! The status endpoint reports uptime every ten seconds; in between, the
//! display ticks once per second from a locally derived epoch. The epoch is
//! only moved when the reported uptime drifts visibly from the extrapolated
//! one, so the counter does not jump on every poll.

use crate::status::StatusSample;

/// Drift beyond which the local epoch is resynchronized to the sample
pub const DRIFT_TOLERANCE_MS: u64 = 2000;

/// Time without an accepted sample after which local extrapolation is
/// no longer trusted
pub const STALE_AFTER_MS: u64 = 30_000;

/// Local view of when the server process started
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockState {
    epoch_ms: Option<u64>,
    last_sample_ms: Option<u64>,
}

impl ClockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a fresh sample in.
    ///
    /// Bootstraps the epoch on the first sample, resynchronizes when the
    /// reported uptime drifts more than [`DRIFT_TOLERANCE_MS`] from the
    /// locally extrapolated one, and otherwise leaves the epoch untouched.
    ///
    /// The returned breakdown is computed from the sample itself, never from
    /// the epoch, so the display always reflects the reported uptime exactly.
    pub fn reconcile(&mut self, sample: &StatusSample, now_ms: u64) -> UptimeBreakdown {
        let implied_ms = sample.uptime_seconds.saturating_mul(1000);
        match self.epoch_ms {
            None => {
                self.epoch_ms = Some(now_ms.saturating_sub(implied_ms));
                tracing::debug!(
                    "Bootstrapped epoch at {:?} from uptime {}s",
                    self.epoch_ms,
                    sample.uptime_seconds
                );
            }
            Some(epoch) => {
                let expected_ms = now_ms.saturating_sub(epoch);
                let drift = implied_ms.abs_diff(expected_ms);
                if drift > DRIFT_TOLERANCE_MS {
                    self.epoch_ms = Some(now_ms.saturating_sub(implied_ms));
                    tracing::debug!("Resynchronized epoch, drift was {}ms", drift);
                }
            }
        }
        self.last_sample_ms = Some(now_ms);
        UptimeBreakdown::from_seconds(sample.uptime_seconds)
    }

    /// Elapsed time since the epoch, or `None` when no epoch is established.
    ///
    /// Callers on a timer must treat `None` as "do not render": the epoch may
    /// have been cleared after the timer was armed.
    pub fn tick(&self, now_ms: u64) -> Option<UptimeBreakdown> {
        self.epoch_ms
            .map(|epoch| UptimeBreakdown::from_seconds(now_ms.saturating_sub(epoch) / 1000))
    }

    /// Whether the last accepted sample is older than [`STALE_AFTER_MS`].
    /// Always false before the first accepted sample.
    pub fn is_stale(&self, now_ms: u64) -> bool {
        self.last_sample_ms
            .is_some_and(|t| now_ms.saturating_sub(t) > STALE_AFTER_MS)
    }

    /// Forget the epoch so the next sample bootstraps afresh
    pub fn invalidate(&mut self) {
        self.epoch_ms = None;
        self.last_sample_ms = None;
    }

    pub fn epoch_ms(&self) -> Option<u64> {
        self.epoch_ms
    }
}

/// A duration broken into display fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UptimeBreakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl UptimeBreakdown {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    /// `"<days> <label> HH:MM:SS"`, with the day segment omitted when zero.
    /// Days are not zero-padded; the label comes from the active language.
    pub fn format(&self, days_label: &str) -> String {
        if self.days > 0 {
            format!(
                "{} {} {:02}:{:02}:{:02}",
                self.days, days_label, self.hours, self.minutes, self.seconds
            )
        } else {
            format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
        }
    }
}
