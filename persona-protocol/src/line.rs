//! Line assembly for the serial console.
//!
//! Bytes arrive one at a time from the UART. CR or LF ends a line; empty
//! lines are dropped. The buffer never grows: once 63 bytes are held,
//! every further byte overwrites the last one until the terminator shows
//! up, so an over-long line keeps its head and its final character.
//! Bytes that are not valid UTF-8 (including a character cut in half by
//! the overwrite) come out as `?`, so every line reaches the command
//! parser and gets a reply.

use heapless::{String, Vec};

/// Size of the receive buffer, including the terminator slot
pub const LINE_BUFFER_SIZE: usize = 64;

/// Usable bytes per line
pub const MAX_LINE_LEN: usize = LINE_BUFFER_SIZE - 1;

/// A completed command line
pub type Line = String<MAX_LINE_LEN>;

/// Stand-in for bytes that are not valid UTF-8
pub const REPLACEMENT: char = '?';

/// Accumulates bytes into lines
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    buffer: Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            overflowed: false,
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    /// Number of bytes currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if no partial line is buffered
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Check if the current line has overflowed the buffer
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Feed a single byte
    ///
    /// Returns the line when a terminator completes a non-empty one,
    /// `None` while more bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\n' | b'\r' => {
                if self.buffer.is_empty() {
                    return None;
                }
                let line = decode_lossy(&self.buffer);
                self.buffer.clear();
                self.overflowed = false;
                Some(line)
            }
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.overflowed = true;
                    if let Some(last) = self.buffer.last_mut() {
                        *last = byte;
                    }
                }
                None
            }
        }
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete line found, if any.
    /// Remaining bytes after a complete line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Line> {
        bytes.iter().find_map(|&byte| self.feed(byte))
    }
}

/// Decode UTF-8, replacing each invalid sequence with [`REPLACEMENT`]
///
/// The result is never longer than the input, so it always fits.
fn decode_lossy(mut bytes: &[u8]) -> Line {
    let mut line = Line::new();
    while !bytes.is_empty() {
        match core::str::from_utf8(bytes) {
            Ok(text) => {
                let _ = line.push_str(text);
                break;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                if let Ok(text) = core::str::from_utf8(valid) {
                    let _ = line.push_str(text);
                }
                let _ = line.push(REPLACEMENT);
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
    line
}
