//! Millisecond clock backed by the embassy time driver

use embassy_time::Instant;
use persona_hal::Clock;

/// Clock reading [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}
