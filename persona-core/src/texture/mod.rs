//! Texture storage
//!
//! Decoded textures are cached by asset identifier so that switching
//! between a handful of personas never decodes the same image twice.

pub mod cache;
pub mod raw;

pub use cache::{
    CacheEntry, CacheError, LoadStatus, Loaded, TextureCache, MAX_ASSET_ID_LEN,
    MAX_CACHED_TEXTURES,
};
pub use raw::{RawAssetDecoder, EYELID_MAGIC, TEXTURE_MAGIC};
