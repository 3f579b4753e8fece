//! Persona bundles
//!
//! A persona is stored as a postcard-serialized [`PersonaConfig`] in the
//! asset partition. [`BundleLoader`] reads one and applies it to the
//! rig.

pub mod loader;
pub mod persona;

pub use crate::traits::ConfigError;
pub use loader::{BundleLoader, MAX_BUNDLE_SIZE};
pub use persona::{EyeConfig, LayerConfig, PersonaConfig};
