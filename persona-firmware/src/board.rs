//! Board bindings
//!
//! Pin assignments for the dual round-display eye board and the glue
//! types that tie the RP2040 HAL to the core traits.

use embassy_rp::peripherals::{SPI0, SPI1};
use embassy_rp::spi;
use persona_hal::{EyeLink, LinkError, SystemInfo};
use persona_hal_rp2040::SpiEyeLink;

/// Number of eye displays
pub const EYE_COUNT: usize = 2;

/// Display labels in rig order
pub const EYE_NAMES: [&str; EYE_COUNT] = ["left", "right"];

/// SPI clock for the ST7789 panels
pub const DISPLAY_SPI_HZ: u32 = 62_500_000;

/// Bytes in one RGB565 column
pub const COLUMN_BYTES: usize = persona_core::eye::DISPLAY_SIZE as usize * 2;

/// Heap size (decoded textures live here)
pub const HEAP_SIZE: usize = 160 * 1024;

/// Either display link
///
/// The two panels sit on different SPI peripherals, so their link types
/// differ; the rig needs one type.
pub enum BoardLink {
    Left(SpiEyeLink<'static, SPI0>),
    Right(SpiEyeLink<'static, SPI1>),
}

impl BoardLink {
    /// Send one rendered column over DMA
    pub async fn send_column(&mut self, pixels: &[u8]) -> Result<(), spi::Error> {
        match self {
            BoardLink::Left(link) => link.send_column(pixels).await,
            BoardLink::Right(link) => link.send_column(pixels).await,
        }
    }
}

impl EyeLink for BoardLink {
    fn is_busy(&self) -> bool {
        match self {
            BoardLink::Left(link) => link.is_busy(),
            BoardLink::Right(link) => link.is_busy(),
        }
    }

    fn abort_transfer(&mut self) {
        match self {
            BoardLink::Left(link) => link.abort_transfer(),
            BoardLink::Right(link) => link.abort_transfer(),
        }
    }

    fn clear_busy(&mut self) {
        match self {
            BoardLink::Left(link) => link.clear_busy(),
            BoardLink::Right(link) => link.clear_busy(),
        }
    }

    fn release(&mut self) {
        match self {
            BoardLink::Left(link) => link.release(),
            BoardLink::Right(link) => link.release(),
        }
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), LinkError> {
        match self {
            BoardLink::Left(link) => link.set_rotation(rotation),
            BoardLink::Right(link) => link.set_rotation(rotation),
        }
    }
}

/// Free-heap telemetry from the global allocator
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapInfo;

impl SystemInfo for HeapInfo {
    fn available_memory(&self) -> usize {
        crate::HEAP.free()
    }
}
