//! Watchdog scratch registers
//!
//! The RP2040 watchdog has eight scratch registers that keep their
//! contents across a watchdog or system reset but not a power cycle.
//! Slots map to scratch registers 0 and 1; the boot ROM uses 4-7.

use embassy_rp::watchdog::Watchdog;
use persona_hal::{RetainedRegisters, RetainedSlot};

/// Retained registers on the watchdog peripheral
pub struct WatchdogScratch {
    watchdog: Watchdog,
}

impl WatchdogScratch {
    pub fn new(watchdog: Watchdog) -> Self {
        Self { watchdog }
    }

    pub fn watchdog_mut(&mut self) -> &mut Watchdog {
        &mut self.watchdog
    }
}

impl RetainedRegisters for WatchdogScratch {
    fn read(&mut self, slot: RetainedSlot) -> u32 {
        self.watchdog.get_scratch(slot.index())
    }

    fn write(&mut self, slot: RetainedSlot, value: u32) {
        self.watchdog.set_scratch(slot.index(), value);
    }
}
