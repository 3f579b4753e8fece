//! Board-agnostic core logic for the persona eye firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Eye state model (layers, render parameters, protected geometry)
//! - Texture cache with no eviction
//! - Persona bundles and the reference asset decoder
//! - Hot-reload orchestrator and render pipeline gate
//! - Persona registry, persistent cycle state and command handlers

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod command;
pub mod config;
pub mod cycle;
pub mod eye;
pub mod registry;
pub mod reload;
pub mod render;
pub mod texture;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
