//! RP2040-specific HAL for the persona eye firmware
//!
//! Implementations of the `persona-hal` traits:
//!
//! - [`link::SpiEyeLink`] - ST7789 display on an SPI bus with chip select
//! - [`retained::WatchdogScratch`] - watchdog scratch registers
//! - [`flash::FlashAssetStore`] - indexed read-only asset partition
//! - [`clock::EmbassyClock`] - embassy-time backed millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod flash;
pub mod link;
pub mod retained;

pub use clock::EmbassyClock;
pub use flash::FlashAssetStore;
pub use link::SpiEyeLink;
pub use retained::WatchdogScratch;
