//! Eye state model
//!
//! One [`Eye`] per physical display plus the state shared by all of them,
//! bundled in an [`EyeRig`]. Hardware bindings (the link) are set at
//! construction and never touched by a reload.

pub mod layer;
pub mod params;

pub use layer::{degrees_to_angle, Layer, Slot, Surface, Texture, MIRROR_FLIP};
pub use params::{EyelidContour, Eyelids, Geometry, RenderParams};

use persona_hal::EyeLink;

/// Display width and height in pixels (square panels)
pub const DISPLAY_SIZE: u16 = 240;

/// Default pupil colour (RGB565 black)
pub const DEFAULT_PUPIL_COLOR: u16 = 0x0000;
/// Default background colour (RGB565 white)
pub const DEFAULT_BACK_COLOR: u16 = 0xFFFF;
/// Default iris fallback colour
pub const DEFAULT_IRIS_COLOR: u16 = 0xFF01;
/// Default sclera fallback colour
pub const DEFAULT_SCLERA_COLOR: u16 = 0xFFFF;
/// Default display rotation (quarter turns)
pub const DEFAULT_ROTATION: u8 = 3;
/// Start angle applied to odd-numbered eyes so textures mirror left/right
pub const ODD_EYE_START_ANGLE: u16 = 512;

/// Blink animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkState {
    #[default]
    NoBlink,
    /// Lid closing
    Enblink,
    /// Lid opening
    Deblink,
}

/// Render state of one eye display
#[derive(Debug)]
pub struct Eye<L> {
    /// Fixed label ("left", "right")
    pub name: &'static str,
    /// Display transport
    pub link: L,
    pub pupil_color: u16,
    pub back_color: u16,
    pub iris: Layer,
    pub sclera: Layer,
    /// Display rotation, per persona
    pub rotation: u8,
    pub blink: BlinkState,
    pub blink_factor: f32,
    /// Next column to render; `DISPLAY_SIZE` forces a new frame
    pub col_num: u16,
    /// Index into the column buffers
    pub col_idx: u16,
    /// A rendered column is waiting for the link
    pub column_ready: bool,
    /// Gaze position in map coordinates
    pub eye_x: f32,
    pub eye_y: f32,
}

impl<L: EyeLink> Eye<L> {
    /// Create an eye with default render state
    ///
    /// `index` is the eye's position in the rig; odd eyes start their
    /// layers half a turn round.
    pub fn new(name: &'static str, link: L, index: usize) -> Self {
        let start_angle = start_angle_for(index);
        Self {
            name,
            link,
            pupil_color: DEFAULT_PUPIL_COLOR,
            back_color: DEFAULT_BACK_COLOR,
            iris: Layer::new(DEFAULT_IRIS_COLOR, start_angle),
            sclera: Layer::new(DEFAULT_SCLERA_COLOR, start_angle),
            rotation: DEFAULT_ROTATION,
            blink: BlinkState::NoBlink,
            blink_factor: 0.0,
            col_num: DISPLAY_SIZE,
            col_idx: 0,
            column_ready: false,
            eye_x: 0.0,
            eye_y: 0.0,
        }
    }

    /// Reset every persona-controlled field to its default
    ///
    /// Leaves the name, link and column cursor alone.
    pub fn reset_render_defaults(&mut self, index: usize) {
        let start_angle = start_angle_for(index);
        self.pupil_color = DEFAULT_PUPIL_COLOR;
        self.back_color = DEFAULT_BACK_COLOR;
        self.iris.reset(DEFAULT_IRIS_COLOR, start_angle);
        self.sclera.reset(DEFAULT_SCLERA_COLOR, start_angle);
        self.rotation = DEFAULT_ROTATION;
        self.blink = BlinkState::NoBlink;
        self.blink_factor = 0.0;
    }

    /// Borrow a layer by slot
    pub fn layer(&self, slot: Slot) -> &Layer {
        match slot {
            Slot::Iris => &self.iris,
            Slot::Sclera => &self.sclera,
        }
    }

    /// Mutably borrow a layer by slot
    pub fn layer_mut(&mut self, slot: Slot) -> &mut Layer {
        match slot {
            Slot::Iris => &mut self.iris,
            Slot::Sclera => &mut self.sclera,
        }
    }

    /// Check if any identifier string is still owned by this eye
    pub fn holds_identifiers(&self) -> bool {
        self.iris.filename.is_some() || self.sclera.filename.is_some()
    }
}

fn start_angle_for(index: usize) -> u16 {
    if index & 1 == 1 {
        ODD_EYE_START_ANGLE
    } else {
        0
    }
}

/// Everything the renderer draws from
pub struct EyeRig<L, const N: usize> {
    pub eyes: [Eye<L>; N],
    pub params: RenderParams,
    pub geometry: Geometry,
    pub eyelids: Eyelids,
}

impl<L: EyeLink, const N: usize> EyeRig<L, N> {
    /// Create a rig around already-constructed eyes
    pub fn new(eyes: [Eye<L>; N], geometry: Geometry) -> Self {
        Self {
            eyes,
            params: RenderParams::default(),
            geometry,
            eyelids: Eyelids::default(),
        }
    }

    /// Check if any eye or eyelid still owns an identifier string
    pub fn holds_identifiers(&self) -> bool {
        self.eyelids.upper_filename.is_some()
            || self.eyelids.lower_filename.is_some()
            || self.eyes.iter().any(Eye::holds_identifiers)
    }
}
