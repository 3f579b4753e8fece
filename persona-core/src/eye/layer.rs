//! Textured eye layers (iris and sclera)

use alloc::string::String;

/// Decoded RGB565 pixel data
///
/// The pixels are never owned by an eye. Decoded buffers live for the
/// rest of the process, which is why the slice is `'static`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Texture {
    /// Row-major RGB565 pixels
    pub pixels: &'static [u16],
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl Texture {
    /// Check if both textures point at the same allocation
    pub fn same_allocation(&self, other: &Texture) -> bool {
        core::ptr::eq(self.pixels, other.pixels)
    }
}

/// What a layer renders
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Surface {
    /// Flat colour at 1×1 logical size (no texture loaded)
    Flat(u16),
    /// Textured
    Texture(Texture),
}

impl Surface {
    /// Logical size in pixels
    pub fn dimensions(&self) -> (u16, u16) {
        match self {
            Surface::Flat(_) => (1, 1),
            Surface::Texture(t) => (t.width, t.height),
        }
    }

    /// The texture, if any
    pub fn texture(&self) -> Option<&Texture> {
        match self {
            Surface::Flat(_) => None,
            Surface::Texture(t) => Some(t),
        }
    }

    /// Check if this surface is a flat colour
    pub fn is_flat(&self) -> bool {
        matches!(self, Surface::Flat(_))
    }
}

/// Which textured layer of an eye
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    Iris,
    Sclera,
}

/// Full turn in layer angle units
pub const ANGLE_RANGE: u16 = 1024;

/// Mirror value that flips a layer horizontally
pub const MIRROR_FLIP: u16 = 1023;

/// One textured layer
#[derive(Debug, Clone)]
pub struct Layer {
    /// Texture identifier, owned only while a config load is resolved
    pub filename: Option<String>,
    /// Resolved surface
    pub surface: Surface,
    /// Fallback colour (RGB565)
    pub color: u16,
    /// Angle at start of a frame sequence (0-1023)
    pub start_angle: u16,
    /// Current angle (0-1023)
    pub angle: u16,
    /// 0 or [`MIRROR_FLIP`]
    pub mirror: u16,
    /// Spin in revolutions per minute
    pub spin: f32,
    /// Integer spin in angle units per frame (overrides `spin` when non-zero)
    pub i_spin: i16,
}

impl Layer {
    /// Create a layer showing a flat colour
    pub fn new(color: u16, start_angle: u16) -> Self {
        Self {
            filename: None,
            surface: Surface::Flat(color),
            color,
            start_angle,
            angle: start_angle,
            mirror: 0,
            spin: 0.0,
            i_spin: 0,
        }
    }

    /// Reset every mutable field to the given defaults
    ///
    /// The identifier is dropped.
    pub fn reset(&mut self, color: u16, start_angle: u16) {
        *self = Self::new(color, start_angle);
    }
}

/// Convert degrees to layer angle units
pub fn degrees_to_angle(degrees: u16) -> u16 {
    ((u32::from(degrees % 360) * u32::from(ANGLE_RANGE)) / 360) as u16
}
