//! Fixed-capacity texture cache
//!
//! Entries are never evicted or replaced. Once the cache is full, new
//! textures are still decoded and used but not remembered. Decoded
//! pixels live for the rest of the process, so every load of an
//! uncached identifier costs a fresh buffer; personas should stay
//! within the cache capacity.

use heapless::{String, Vec};

use crate::eye::{Surface, Texture};
use crate::traits::{AssetDecoder, DecodeError};

/// Maximum number of cached textures
pub const MAX_CACHED_TEXTURES: usize = 8;

/// Maximum stored identifier length in bytes
///
/// Longer identifiers are truncated on a char boundary, both on insert
/// and on lookup.
pub const MAX_ASSET_ID_LEN: usize = 47;

type AssetId = String<MAX_ASSET_ID_LEN>;

/// One cached texture
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub id: AssetId,
    pub texture: Texture,
}

/// Errors from cache insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CacheError {
    /// All slots are taken
    Full,
    /// An entry with this identifier already exists
    Duplicate,
}

/// How a surface was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadStatus {
    /// No identifier given, flat colour used
    NotFound,
    /// Served from the cache
    CacheHit,
    /// Freshly decoded; `cached` is false when the cache was full
    Decoded { cached: bool },
    /// Decoder failed, flat colour used
    Failed(DecodeError),
}

/// Result of [`TextureCache::load_with_cache`]
#[derive(Debug, Clone, Copy)]
pub struct Loaded {
    pub surface: Surface,
    pub status: LoadStatus,
}

/// Texture cache
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: Vec<CacheEntry, MAX_CACHED_TEXTURES>,
}

impl TextureCache {
    /// Create an empty cache
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of cached textures
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if no more entries can be inserted
    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    /// Iterate over cached entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.iter()
    }

    /// Find an entry by identifier
    pub fn lookup(&self, id: &str) -> Option<&CacheEntry> {
        let key = truncate_id(id);
        self.entries.iter().find(|e| e.id == key)
    }

    /// Insert a texture
    ///
    /// Rejects duplicates and inserts past capacity; the cache is left
    /// unchanged in both cases.
    pub fn insert(&mut self, id: &str, texture: Texture) -> Result<(), CacheError> {
        let key = truncate_id(id);
        if self.entries.iter().any(|e| e.id == key) {
            return Err(CacheError::Duplicate);
        }
        self.entries
            .push(CacheEntry { id: key, texture })
            .map_err(|_| CacheError::Full)
    }

    /// Resolve an identifier to a surface, decoding on a miss
    ///
    /// Never fails: a missing identifier or a decoder error yields a
    /// flat `fallback` surface, and the reason is reported in the
    /// status.
    pub fn load_with_cache<D: AssetDecoder>(
        &mut self,
        id: Option<&str>,
        fallback: u16,
        decoder: &mut D,
        max_ram: usize,
    ) -> Loaded {
        let Some(id) = id else {
            return Loaded {
                surface: Surface::Flat(fallback),
                status: LoadStatus::NotFound,
            };
        };

        if let Some(entry) = self.lookup(id) {
            return Loaded {
                surface: Surface::Texture(entry.texture),
                status: LoadStatus::CacheHit,
            };
        }

        match decoder.decode_texture(id, max_ram) {
            Ok(texture) => {
                let cached = self.insert(id, texture).is_ok();
                Loaded {
                    surface: Surface::Texture(texture),
                    status: LoadStatus::Decoded { cached },
                }
            }
            Err(e) => Loaded {
                surface: Surface::Flat(fallback),
                status: LoadStatus::Failed(e),
            },
        }
    }
}

fn truncate_id(id: &str) -> AssetId {
    let mut key = AssetId::new();
    for c in id.chars() {
        if key.push(c).is_err() {
            break;
        }
    }
    key
}
