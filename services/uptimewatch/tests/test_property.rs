#[cfg(not(miri))] // Skip property tests under miri as they're too slow
use proptest::prelude::*;
#[cfg(not(miri))]
use uptimewatch::clock::{ClockState, UptimeBreakdown};
#[cfg(not(miri))]
use uptimewatch::status::StatusSample;

#[cfg(not(miri))]
fn sample(uptime_seconds: u64) -> StatusSample {
    StatusSample {
        uptime_seconds,
        latency_ms: 1.0,
    }
}

#[cfg(not(miri))]
proptest! {
    #[test]
    fn breakdown_fields_are_bounded(total in 0u64..=10_000_000_000) {
        let b = UptimeBreakdown::from_seconds(total);
        prop_assert!(b.hours < 24);
        prop_assert!(b.minutes < 60);
        prop_assert!(b.seconds < 60);
        prop_assert_eq!(b.total_seconds(), total);
    }

    #[test]
    fn format_always_ends_with_padded_clock(total in 0u64..=10_000_000_000, label in "[a-z]{1,8}") {
        let text = UptimeBreakdown::from_seconds(total).format(&label);
        let clock_part = text.rsplit(' ').next().unwrap();
        prop_assert_eq!(clock_part.len(), 8);
        for part in clock_part.split(':') {
            prop_assert_eq!(part.len(), 2);
            prop_assert!(part.parse::<u64>().is_ok());
        }
        if total >= 86_400 {
            prop_assert!(text.contains(&label));
            prop_assert!(!text.starts_with('0'));
        } else {
            prop_assert_eq!(text.len(), 8);
        }
    }

    #[test]
    fn tick_is_monotonic_between_reconciliations(
        uptime in 0u64..=1_000_000,
        start in 1_000_000_000u64..=2_000_000_000,
        mut offsets in prop::collection::vec(0u64..100_000, 1..20),
    ) {
        let mut clock = ClockState::new();
        clock.reconcile(&sample(uptime), start);
        offsets.sort_unstable();

        let mut previous = 0;
        for offset in offsets {
            let total = clock.tick(start + offset).unwrap().total_seconds();
            prop_assert!(total >= previous);
            previous = total;
        }
    }

    #[test]
    fn jitter_within_tolerance_keeps_epoch(
        uptime in 200u64..=1_000_000,
        start in 1_000_000_000u64..=2_000_000_000,
        jitter_seconds in -2i64..=2,
    ) {
        let mut clock = ClockState::new();
        clock.reconcile(&sample(uptime), start);
        let epoch = clock.epoch_ms();

        // ten seconds later the reported uptime is off by at most two seconds
        let reported = (uptime as i64 + 10 + jitter_seconds) as u64;
        clock.reconcile(&sample(reported), start + 10_000);
        prop_assert_eq!(clock.epoch_ms(), epoch);
    }

    #[test]
    fn drift_beyond_tolerance_resyncs(
        uptime in 200u64..=1_000_000,
        start in 2_000_000_000u64..=3_000_000_000,
        drift_seconds in 3u64..=10_000,
        ahead in proptest::bool::ANY,
    ) {
        let mut clock = ClockState::new();
        clock.reconcile(&sample(uptime), start);

        let now = start + 10_000;
        let reported = if ahead {
            uptime + 10 + drift_seconds
        } else {
            (uptime + 10).saturating_sub(drift_seconds)
        };
        clock.reconcile(&sample(reported), now);
        prop_assert_eq!(clock.epoch_ms(), Some(now - reported * 1000));
    }
}
