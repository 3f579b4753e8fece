//! Persona Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the persona core needs from a
//! board. Chip-specific crates (currently RP2040) implement them, which
//! keeps the reload and command logic testable on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (persona-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  persona-core (reload, cache, commands) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  persona-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ persona-hal-rp2040│
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`link::EyeLink`] - Display transport (SPI + DMA + chip select)
//! - [`retained::RetainedRegisters`] - Registers that survive a warm reset
//! - [`storage::AssetStore`] - Read-only asset partition
//! - [`system::Clock`], [`system::SystemInfo`] - Time and heap telemetry

#![no_std]
#![deny(unsafe_code)]

pub mod link;
pub mod retained;
pub mod storage;
pub mod system;

// Re-export key traits at crate root for convenience
pub use link::{EyeLink, LinkError};
pub use retained::{RetainedRegisters, RetainedSlot};
pub use storage::{AssetStore, StoreError};
pub use system::{Clock, SystemInfo};
