//! Image decoder trait

use persona_hal::StoreError;

use crate::eye::{Texture, DISPLAY_SIZE};

/// Errors that can occur while decoding an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// No asset with this identifier
    NotFound,
    /// Storage failed mid-read
    Store(StoreError),
    /// Header magic or dimensions are invalid
    BadHeader,
    /// Decoded size exceeds the RAM ceiling
    TooLarge,
    /// Heap allocation failed
    OutOfMemory,
}

impl From<StoreError> for DecodeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => DecodeError::NotFound,
            other => DecodeError::Store(other),
        }
    }
}

/// Per-column extent of an eyelid mask
///
/// Columns the mask leaves uncovered keep the init value passed to
/// [`AssetDecoder::decode_eyelid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EyelidMap {
    /// Lowest covered row per column
    pub min: [u8; DISPLAY_SIZE as usize],
    /// Highest covered row per column
    pub max: [u8; DISPLAY_SIZE as usize],
}

impl EyelidMap {
    /// A map with every column at `init`
    pub const fn filled(init: u8) -> Self {
        Self {
            min: [init; DISPLAY_SIZE as usize],
            max: [init; DISPLAY_SIZE as usize],
        }
    }
}

/// Decoder for texture and eyelid assets
pub trait AssetDecoder {
    /// Decode an RGB565 texture
    ///
    /// The returned pixels must stay valid for the rest of the process;
    /// the cache hands them to every eye that asks for the same id.
    /// Fails with [`DecodeError::TooLarge`] if the pixels need more than
    /// `max_ram` bytes.
    fn decode_texture(&mut self, id: &str, max_ram: usize) -> Result<Texture, DecodeError>;

    /// Decode a 1-bit eyelid mask into per-column row extents
    fn decode_eyelid(&mut self, id: &str, init: u8, max_ram: usize)
        -> Result<EyelidMap, DecodeError>;
}
