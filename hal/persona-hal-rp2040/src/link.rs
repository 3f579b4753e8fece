//! SPI display link
//!
//! Each eye is an ST7789 panel on its own SPI bus. Column transfers are
//! started by the render path, which owns the busy flag together with
//! the link; the flag is an atomic so a transfer-complete callback can
//! clear it.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_rp::gpio::Output;
use embassy_rp::spi::{Async, Instance, Spi};
use persona_hal::{EyeLink, LinkError};

/// ST7789 memory data access control
const CMD_MADCTL: u8 = 0x36;

/// MADCTL values for rotations 0-3
const MADCTL_ROTATION: [u8; 4] = [0x00, 0x60, 0xC0, 0xA0];

/// One display on its SPI bus
pub struct SpiEyeLink<'d, T: Instance> {
    spi: Spi<'d, T, Async>,
    cs: Output<'d>,
    dc: Output<'d>,
    busy: AtomicBool,
}

impl<'d, T: Instance> SpiEyeLink<'d, T> {
    pub fn new(spi: Spi<'d, T, Async>, cs: Output<'d>, dc: Output<'d>) -> Self {
        Self {
            spi,
            cs,
            dc,
            busy: AtomicBool::new(false),
        }
    }

    /// Send one rendered column
    ///
    /// The busy flag is held for the duration of the DMA transfer.
    /// Dropping the future aborts the transfer.
    pub async fn send_column(&mut self, pixels: &[u8]) -> Result<(), embassy_rp::spi::Error> {
        self.busy.store(true, Ordering::Release);
        self.cs.set_low();
        self.dc.set_high();
        let result = self.spi.write(pixels).await;
        self.busy.store(false, Ordering::Release);
        result
    }

    /// Send a command byte and its parameters in one chip-select window
    fn command(&mut self, cmd: u8, data: &[u8]) -> Result<(), LinkError> {
        self.cs.set_low();
        let result = self.write_command(cmd, data);
        self.cs.set_high();
        result.map_err(|_| LinkError::Bus)
    }

    fn write_command(&mut self, cmd: u8, data: &[u8]) -> Result<(), embassy_rp::spi::Error> {
        self.dc.set_low();
        self.spi.blocking_write(&[cmd])?;
        self.dc.set_high();
        self.spi.blocking_write(data)
    }
}

impl<T: Instance> EyeLink for SpiEyeLink<'_, T> {
    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn abort_transfer(&mut self) {
        // DMA stops when the transfer future is dropped; only the flag
        // can be stale here
        self.busy.store(false, Ordering::Release);
    }

    fn clear_busy(&mut self) {
        self.busy.store(false, Ordering::Release);
    }

    fn release(&mut self) {
        self.cs.set_high();
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), LinkError> {
        let madctl = MADCTL_ROTATION[usize::from(rotation & 3)];
        self.command(CMD_MADCTL, &[madctl])
    }
}
