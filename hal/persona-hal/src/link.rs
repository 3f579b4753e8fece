//! Display link abstraction
//!
//! Each eye display hangs off its own SPI bus with a chip select and a
//! DMA channel. The render path starts column transfers; the reload path
//! only needs to observe, abort and detach them.

/// Errors from display link commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// The bus rejected or failed the write
    Bus,
}

/// Transport to one eye display
///
/// The busy flag is owned by the implementation because it is cleared
/// from the transfer-complete path, not by the caller.
pub trait EyeLink {
    /// Check if a column transfer is still in flight
    fn is_busy(&self) -> bool;

    /// Abort an in-flight transfer
    ///
    /// Resets the DMA channel and clears the busy flag. Used when a
    /// transfer does not complete within the drain deadline.
    fn abort_transfer(&mut self);

    /// Clear the busy flag without touching the DMA channel
    fn clear_busy(&mut self);

    /// Deselect the display and end the bus transaction
    ///
    /// Must only be called once the link is idle.
    fn release(&mut self);

    /// Apply a display rotation (0-3, quarter turns)
    fn set_rotation(&mut self, rotation: u8) -> Result<(), LinkError>;
}
