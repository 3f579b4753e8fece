//! Global render parameters, boot-time geometry and eyelid contours

use alloc::string::String;

use super::DISPLAY_SIZE;

/// Global animation parameters
///
/// Reset to [`RenderParams::default`] before every config load so an
/// omitted field never keeps the previous persona's value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderParams {
    /// Eyes follow the tracking target
    pub tracking: bool,
    /// Tracking smoothing (0 = frozen, 1 = instant)
    pub track_factor: f32,
    /// Upper bound for a gaze hold, in microseconds
    pub gaze_max_us: u32,
    /// Smallest iris scale
    pub iris_min: f32,
    /// Iris scale range above `iris_min`
    pub iris_range: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            tracking: true,
            track_factor: 0.5,
            gaze_max_us: 3_000_000,
            iris_min: 0.45,
            iris_range: 0.35,
        }
    }
}

/// Geometry baked into the polar lookup tables
///
/// Fixed at first boot. Reloads restore it bit-for-bit because changing
/// any field would require regenerating the tables.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    pub eye_radius: i32,
    pub eye_diameter: i32,
    pub iris_radius: i32,
    pub slit_pupil_radius: i32,
    pub map_radius: i32,
    pub map_diameter: i32,
    /// Fraction of the display the eye covers
    pub coverage: f32,
}

impl Geometry {
    /// Derive the full geometry from the configurable radii
    pub fn new(eye_radius: i32, iris_radius: i32, slit_pupil_radius: i32, coverage: f32) -> Self {
        let map_radius = (eye_radius as f32 * core::f32::consts::FRAC_PI_2 + 0.5) as i32;
        Self {
            eye_radius,
            eye_diameter: eye_radius.saturating_mul(2),
            iris_radius,
            slit_pupil_radius,
            map_radius,
            map_diameter: map_radius.saturating_mul(2),
            coverage,
        }
    }

    /// Compare field by field, floats by bit pattern
    pub fn bits_eq(&self, other: &Geometry) -> bool {
        self.eye_radius == other.eye_radius
            && self.eye_diameter == other.eye_diameter
            && self.iris_radius == other.iris_radius
            && self.slit_pupil_radius == other.slit_pupil_radius
            && self.map_radius == other.map_radius
            && self.map_diameter == other.map_diameter
            && self.coverage.to_bits() == other.coverage.to_bits()
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(125, 60, 0, 0.65)
    }
}

/// Column contour of one eyelid
#[derive(Debug, Clone)]
pub struct EyelidContour {
    /// Row of the lid edge per column with the eye fully open
    pub open: [u8; DISPLAY_SIZE as usize],
    /// Row of the lid edge per column with the eye closed
    pub closed: [u8; DISPLAY_SIZE as usize],
}

impl EyelidContour {
    /// A contour with every column at `row`
    pub const fn flat(row: u8) -> Self {
        Self {
            open: [row; DISPLAY_SIZE as usize],
            closed: [row; DISPLAY_SIZE as usize],
        }
    }
}

/// Default upper eyelid asset
pub const DEFAULT_UPPER_EYELID: &str = "upper.bmp";

/// Default lower eyelid asset
pub const DEFAULT_LOWER_EYELID: &str = "lower.bmp";

/// Row used for columns the upper eyelid mask leaves uncovered
pub const UPPER_EYELID_INIT: u8 = (DISPLAY_SIZE - 1) as u8;

/// Row used for columns the lower eyelid mask leaves uncovered
pub const LOWER_EYELID_INIT: u8 = 0;

/// Eyelid overlays shared by both eyes
#[derive(Debug, Clone)]
pub struct Eyelids {
    /// Upper eyelid identifier, owned only during a config load
    pub upper_filename: Option<String>,
    /// Lower eyelid identifier, owned only during a config load
    pub lower_filename: Option<String>,
    pub upper: EyelidContour,
    pub lower: EyelidContour,
}

impl Default for Eyelids {
    fn default() -> Self {
        Self {
            upper_filename: None,
            lower_filename: None,
            upper: EyelidContour::flat(UPPER_EYELID_INIT),
            lower: EyelidContour::flat(LOWER_EYELID_INIT),
        }
    }
}
