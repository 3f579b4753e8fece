//! Collaborator traits
//!
//! The reload pipeline only sees the image decoder and the persona
//! loader through these traits. Reference implementations live in
//! [`crate::texture::raw`] and [`crate::config::loader`].

pub mod decoder;
pub mod loader;

pub use decoder::{AssetDecoder, DecodeError, EyelidMap};
pub use loader::{ConfigError, ConfigLoader};
