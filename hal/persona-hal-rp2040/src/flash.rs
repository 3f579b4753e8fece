//! Asset partition in external flash
//!
//! Layout, all integers little-endian, offsets relative to the
//! partition start:
//!
//! ```text
//! 0x0000  "PAST"  u16 entry count  u16 reserved
//! 0x0008  entry[count], 64 bytes each:
//!           name[48] (NUL padded)  u32 offset  u32 length  u8[8] reserved
//! ....    asset data
//! ```
//!
//! The partition is written by the host-side packing tool; the firmware
//! only reads it.

use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use persona_hal::{AssetStore, StoreError};

/// Flash size of the eye board
pub const FLASH_SIZE: usize = 8 * 1024 * 1024;

/// Asset partition start (firmware lives below)
pub const ASSET_PARTITION_START: u32 = 1024 * 1024;

/// Asset partition size
pub const ASSET_PARTITION_SIZE: u32 = FLASH_SIZE as u32 - ASSET_PARTITION_START;

const PARTITION_MAGIC: [u8; 4] = *b"PAST";
const HEADER_LEN: u32 = 8;
const ENTRY_LEN: u32 = 64;
const NAME_LEN: usize = 48;

#[derive(Debug, Clone, Copy)]
struct Entry {
    offset: u32,
    length: u32,
}

/// Read-only asset store over the flash partition
pub struct FlashAssetStore<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
    count: u16,
}

impl<'d> FlashAssetStore<'d> {
    /// Create an unmounted store; every lookup fails until [`Self::mount`]
    pub fn new(flash: Peri<'d, FLASH>) -> Self {
        Self {
            flash: Flash::new_blocking(flash),
            count: 0,
        }
    }

    /// Validate the partition header and load the entry count
    pub fn mount(&mut self) -> Result<usize, StoreError> {
        self.count = 0;
        let mut header = [0u8; HEADER_LEN as usize];
        self.read_raw(0, &mut header)?;
        if header[..4] != PARTITION_MAGIC {
            return Err(StoreError::Corrupted);
        }
        let count = u16::from_le_bytes([header[4], header[5]]);
        if HEADER_LEN + u32::from(count) * ENTRY_LEN > ASSET_PARTITION_SIZE {
            return Err(StoreError::Corrupted);
        }
        self.count = count;
        Ok(usize::from(count))
    }

    /// Number of indexed assets
    pub fn len(&self) -> usize {
        usize::from(self.count)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn read_raw(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StoreError> {
        self.flash
            .blocking_read(ASSET_PARTITION_START + offset, buf)
            .map_err(|_| StoreError::Flash)
    }

    fn find(&mut self, id: &str) -> Result<Entry, StoreError> {
        if id.len() >= NAME_LEN {
            return Err(StoreError::NotFound);
        }
        let mut raw = [0u8; ENTRY_LEN as usize];
        for i in 0..u32::from(self.count) {
            self.read_raw(HEADER_LEN + i * ENTRY_LEN, &mut raw)?;
            let name = &raw[..NAME_LEN];
            let end = name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
            if &name[..end] != id.as_bytes() {
                continue;
            }
            let word = |at: usize| u32::from_le_bytes([raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]);
            let entry = Entry {
                offset: word(NAME_LEN),
                length: word(NAME_LEN + 4),
            };
            let end = entry.offset.checked_add(entry.length);
            return match end {
                Some(end) if end <= ASSET_PARTITION_SIZE => Ok(entry),
                _ => Err(StoreError::Corrupted),
            };
        }
        Err(StoreError::NotFound)
    }
}

impl AssetStore for FlashAssetStore<'_> {
    fn size(&mut self, id: &str) -> Result<usize, StoreError> {
        self.find(id).map(|e| e.length as usize)
    }

    fn read(&mut self, id: &str, offset: usize, buf: &mut [u8]) -> Result<usize, StoreError> {
        let entry = self.find(id)?;
        let length = entry.length as usize;
        if offset > length {
            return Err(StoreError::OutOfRange);
        }
        let n = buf.len().min(length - offset);
        self.read_raw(entry.offset + offset as u32, &mut buf[..n])?;
        Ok(n)
    }
}
