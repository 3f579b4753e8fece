//! Retained register abstractions
//!
//! A handful of 32-bit registers keep their value across a warm reset
//! (watchdog or software reset) but come up undefined after power loss.
//! Callers tag what they store so they can tell the two apart.

/// Register slots used by the firmware
///
/// Slot numbers map directly to hardware scratch register indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RetainedSlot {
    /// Autonomous style cycle index
    CycleIndex = 0,
    /// Autonomous cycling enable flag
    CycleEnabled = 1,
}

impl RetainedSlot {
    /// Get the slot as a register index
    pub fn index(self) -> usize {
        self as usize
    }

    /// Create a slot from a register index
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(RetainedSlot::CycleIndex),
            1 => Some(RetainedSlot::CycleEnabled),
            _ => None,
        }
    }
}

/// Registers that survive a warm reset
///
/// Takes `&mut self` for reads because some chips gate scratch access
/// behind a peripheral handle.
pub trait RetainedRegisters {
    /// Read the raw register contents
    fn read(&mut self, slot: RetainedSlot) -> u32;

    /// Write the raw register contents
    fn write(&mut self, slot: RetainedSlot, value: u32);
}
