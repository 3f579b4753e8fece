//! Reference decoder for raw asset formats
//!
//! Two formats, both little-endian with an 8-byte header
//! (4-byte magic, u16 width, u16 height):
//!
//! - `R565`: `width * height` RGB565 pixels, row-major
//! - `M1BT`: 1-bit mask, rows of `ceil(width / 8)` bytes, MSB first.
//!   A set bit marks the open region of an eyelid.

use alloc::boxed::Box;
use alloc::vec::Vec;

use persona_hal::AssetStore;

use crate::eye::{Texture, DISPLAY_SIZE};
use crate::traits::{AssetDecoder, DecodeError, EyelidMap};

/// Magic for RGB565 textures
pub const TEXTURE_MAGIC: [u8; 4] = *b"R565";

/// Magic for 1-bit eyelid masks
pub const EYELID_MAGIC: [u8; 4] = *b"M1BT";

const HEADER_LEN: usize = 8;
const CHUNK_LEN: usize = 64;
const MAX_MASK_ROW: usize = (DISPLAY_SIZE as usize).div_ceil(8);

/// Decoder reading raw assets from an [`AssetStore`]
///
/// Decoded texture buffers are leaked and live for the rest of the
/// process. The texture cache remembers the ones it has room for.
pub struct RawAssetDecoder<S> {
    store: S,
}

impl<S: AssetStore> RawAssetDecoder<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn read_header(&mut self, id: &str, magic: [u8; 4]) -> Result<(usize, usize), DecodeError> {
        let mut header = [0u8; HEADER_LEN];
        let n = self.store.read(id, 0, &mut header)?;
        if n < HEADER_LEN || header[..4] != magic {
            return Err(DecodeError::BadHeader);
        }
        let width = u16::from_le_bytes([header[4], header[5]]) as usize;
        let height = u16::from_le_bytes([header[6], header[7]]) as usize;
        if width == 0 || height == 0 {
            return Err(DecodeError::BadHeader);
        }
        Ok((width, height))
    }
}

impl<S: AssetStore> AssetDecoder for RawAssetDecoder<S> {
    fn decode_texture(&mut self, id: &str, max_ram: usize) -> Result<Texture, DecodeError> {
        let (width, height) = self.read_header(id, TEXTURE_MAGIC)?;
        let count = width * height;
        let bytes = count * 2;
        if bytes > max_ram {
            return Err(DecodeError::TooLarge);
        }
        if self.store.size(id)? < HEADER_LEN + bytes {
            return Err(DecodeError::BadHeader);
        }

        let mut pixels: Vec<u16> = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| DecodeError::OutOfMemory)?;

        let mut chunk = [0u8; CHUNK_LEN];
        let mut offset = HEADER_LEN;
        while pixels.len() < count {
            let want = ((count - pixels.len()) * 2).min(CHUNK_LEN);
            let n = self.store.read(id, offset, &mut chunk[..want])?;
            if n < want {
                return Err(DecodeError::BadHeader);
            }
            pixels.extend(
                chunk[..n]
                    .chunks_exact(2)
                    .map(|p| u16::from_le_bytes([p[0], p[1]])),
            );
            offset += n;
        }

        let pixels: &'static [u16] = Box::leak(pixels.into_boxed_slice());
        Ok(Texture {
            pixels,
            width: width as u16,
            height: height as u16,
        })
    }

    fn decode_eyelid(
        &mut self,
        id: &str,
        init: u8,
        max_ram: usize,
    ) -> Result<EyelidMap, DecodeError> {
        let (width, height) = self.read_header(id, EYELID_MAGIC)?;
        if width > DISPLAY_SIZE as usize || height > DISPLAY_SIZE as usize {
            return Err(DecodeError::BadHeader);
        }
        let row_len = width.div_ceil(8);
        if row_len > max_ram {
            return Err(DecodeError::TooLarge);
        }

        let mut map = EyelidMap::filled(init);
        let mut seen = [false; DISPLAY_SIZE as usize];
        let mut row = [0u8; MAX_MASK_ROW];

        for y in 0..height {
            let offset = HEADER_LEN + y * row_len;
            let n = self.store.read(id, offset, &mut row[..row_len])?;
            if n < row_len {
                return Err(DecodeError::BadHeader);
            }
            for x in 0..width {
                if row[x / 8] & (0x80 >> (x % 8)) == 0 {
                    continue;
                }
                if !seen[x] {
                    map.min[x] = y as u8;
                    seen[x] = true;
                }
                map.max[x] = y as u8;
            }
        }

        Ok(map)
    }
}
