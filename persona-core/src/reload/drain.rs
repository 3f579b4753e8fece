//! Bounded wait for an in-flight transfer

use embassy_futures::yield_now;
use persona_hal::Clock;

/// Drain deadline per display
pub const DRAIN_TIMEOUT_MS: u32 = 100;

/// How a drain finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrainOutcome {
    /// Nothing was in flight
    AlreadyIdle,
    /// The transfer completed before the deadline
    Drained,
    /// Deadline passed; the caller must abort the transfer
    Forced,
}

/// Wait until `is_busy` reports idle or `timeout_ms` elapses
///
/// Yields to the executor between polls so the transfer-complete path
/// can run.
pub async fn drain<C: Clock>(
    mut is_busy: impl FnMut() -> bool,
    clock: &C,
    timeout_ms: u32,
) -> DrainOutcome {
    if !is_busy() {
        return DrainOutcome::AlreadyIdle;
    }

    let start = clock.now_ms();
    loop {
        if clock.elapsed_ms(start) > timeout_ms {
            return DrainOutcome::Forced;
        }
        yield_now().await;
        if !is_busy() {
            return DrainOutcome::Drained;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClock;
    use embassy_futures::block_on;

    #[test]
    fn test_idle_link_returns_immediately() {
        let clock = MockClock::stepping(1);
        let outcome = block_on(drain(|| false, &clock, DRAIN_TIMEOUT_MS));
        assert_eq!(outcome, DrainOutcome::AlreadyIdle);
    }

    #[test]
    fn test_drains_before_deadline() {
        let clock = MockClock::stepping(1);
        let mut polls = 0;
        let outcome = block_on(drain(
            || {
                polls += 1;
                polls < 5
            },
            &clock,
            DRAIN_TIMEOUT_MS,
        ));
        assert_eq!(outcome, DrainOutcome::Drained);
    }

    #[test]
    fn test_stuck_link_is_forced_after_deadline() {
        let clock = MockClock::stepping(7);
        let outcome = block_on(drain(|| true, &clock, DRAIN_TIMEOUT_MS));
        assert_eq!(outcome, DrainOutcome::Forced);
        assert!(clock.current() > DRAIN_TIMEOUT_MS);
    }

    #[test]
    fn test_deadline_survives_clock_wrap() {
        let clock = MockClock::starting_at(u32::MAX - 10, 3);
        let outcome = block_on(drain(|| true, &clock, DRAIN_TIMEOUT_MS));
        assert_eq!(outcome, DrainOutcome::Forced);
    }
}
