//! Persistent style cycle state
//!
//! The active style index and the autocycle flag live in two retained
//! registers so they survive the warm reset used to switch styles. Each
//! register holds `CYCLE_MAGIC << 16 | payload`; a register without the
//! magic (power-on garbage) reads as the default.

use persona_hal::{RetainedRegisters, RetainedSlot};

/// Tag in the upper half of each register
pub const CYCLE_MAGIC: u16 = 0xC7C1;

/// Decoded cycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleRecord {
    /// Index into the style table
    pub index: u8,
    /// Autonomous cycling enabled
    pub enabled: bool,
}

impl Default for CycleRecord {
    fn default() -> Self {
        Self {
            index: 0,
            enabled: true,
        }
    }
}

fn encode(payload: u8) -> u32 {
    (u32::from(CYCLE_MAGIC) << 16) | u32::from(payload)
}

fn decode(raw: u32) -> Option<u8> {
    if (raw >> 16) as u16 == CYCLE_MAGIC {
        Some((raw & 0xFF) as u8)
    } else {
        None
    }
}

/// Cycle record stored in retained registers
pub struct CycleStore<R> {
    regs: R,
}

impl<R: RetainedRegisters> CycleStore<R> {
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Read the record
    ///
    /// An index that is untagged or not below `count` reads as 0. An
    /// untagged enable flag reads as enabled.
    pub fn load(&mut self, count: usize) -> CycleRecord {
        let index = decode(self.regs.read(RetainedSlot::CycleIndex))
            .filter(|&i| usize::from(i) < count)
            .unwrap_or(0);
        let enabled = decode(self.regs.read(RetainedSlot::CycleEnabled)).map_or(true, |v| v != 0);
        CycleRecord { index, enabled }
    }

    /// Write both registers
    pub fn save(&mut self, record: CycleRecord) {
        self.regs.write(RetainedSlot::CycleIndex, encode(record.index));
        self.regs
            .write(RetainedSlot::CycleEnabled, encode(u8::from(record.enabled)));
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.regs
    }
}
