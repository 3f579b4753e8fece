//! Persona configuration types
//!
//! Every field is optional. An omitted field leaves the rig's current
//! value, which during a reload is the reset default.

use alloc::string::String;
use alloc::vec::Vec;

use persona_hal::EyeLink;
use serde::{Deserialize, Serialize};

use crate::eye::{degrees_to_angle, Eye, EyeRig, Geometry, Layer, MIRROR_FLIP};

/// One textured layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Texture asset identifier
    pub texture: Option<String>,
    /// Fallback colour (RGB565)
    pub color: Option<u16>,
    /// Start angle in degrees
    pub angle: Option<u16>,
    /// Flip horizontally
    pub mirror: Option<bool>,
    /// Spin in revolutions per minute
    pub spin: Option<f32>,
    /// Integer spin in angle units per frame
    pub i_spin: Option<i16>,
}

impl LayerConfig {
    fn apply(&self, layer: &mut Layer) {
        if let Some(texture) = &self.texture {
            layer.filename = Some(texture.clone());
        }
        if let Some(color) = self.color {
            layer.color = color;
        }
        if let Some(degrees) = self.angle {
            layer.start_angle = degrees_to_angle(degrees);
            layer.angle = layer.start_angle;
        }
        if let Some(mirror) = self.mirror {
            layer.mirror = if mirror { MIRROR_FLIP } else { 0 };
        }
        if let Some(spin) = self.spin {
            layer.spin = spin;
        }
        if let Some(i_spin) = self.i_spin {
            layer.i_spin = i_spin;
        }
    }
}

/// Settings for one eye
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EyeConfig {
    pub pupil_color: Option<u16>,
    pub back_color: Option<u16>,
    /// Display rotation in quarter turns
    pub rotation: Option<u8>,
    pub iris: LayerConfig,
    pub sclera: LayerConfig,
}

impl EyeConfig {
    fn apply<L>(&self, eye: &mut Eye<L>) {
        if let Some(color) = self.pupil_color {
            eye.pupil_color = color;
        }
        if let Some(color) = self.back_color {
            eye.back_color = color;
        }
        if let Some(rotation) = self.rotation {
            eye.rotation = rotation & 3;
        }
        self.iris.apply(&mut eye.iris);
        self.sclera.apply(&mut eye.sclera);
    }
}

/// A complete persona
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Requested eye radius (only honoured at first boot)
    pub eye_radius: Option<i32>,
    /// Requested iris radius (only honoured at first boot)
    pub iris_radius: Option<i32>,
    /// Requested slit pupil radius (only honoured at first boot)
    pub slit_pupil_radius: Option<i32>,
    /// Requested display coverage (only honoured at first boot)
    pub coverage: Option<f32>,
    pub tracking: Option<bool>,
    pub track_factor: Option<f32>,
    /// Gaze hold bound in microseconds
    pub gaze_max: Option<u32>,
    pub iris_min: Option<f32>,
    pub iris_range: Option<f32>,
    /// Upper eyelid mask identifier
    pub upper_eyelid: Option<String>,
    /// Lower eyelid mask identifier
    pub lower_eyelid: Option<String>,
    /// Settings applied to every eye
    pub eye: EyeConfig,
    /// Per-eye overrides, in rig order, applied after `eye`
    pub per_eye: Vec<EyeConfig>,
}

impl PersonaConfig {
    /// Write every present field into the rig
    ///
    /// Geometry is written too; protecting it is the caller's job.
    pub fn apply<L: EyeLink, const N: usize>(&self, rig: &mut EyeRig<L, N>) {
        if self.eye_radius.is_some()
            || self.iris_radius.is_some()
            || self.slit_pupil_radius.is_some()
            || self.coverage.is_some()
        {
            let g = rig.geometry;
            rig.geometry = Geometry::new(
                self.eye_radius.unwrap_or(g.eye_radius),
                self.iris_radius.unwrap_or(g.iris_radius),
                self.slit_pupil_radius.unwrap_or(g.slit_pupil_radius),
                self.coverage.unwrap_or(g.coverage),
            );
        }

        let params = &mut rig.params;
        if let Some(v) = self.tracking {
            params.tracking = v;
        }
        if let Some(v) = self.track_factor {
            params.track_factor = v;
        }
        if let Some(v) = self.gaze_max {
            params.gaze_max_us = v;
        }
        if let Some(v) = self.iris_min {
            params.iris_min = v;
        }
        if let Some(v) = self.iris_range {
            params.iris_range = v;
        }

        if let Some(id) = &self.upper_eyelid {
            rig.eyelids.upper_filename = Some(id.clone());
        }
        if let Some(id) = &self.lower_eyelid {
            rig.eyelids.lower_filename = Some(id.clone());
        }

        for (i, eye) in rig.eyes.iter_mut().enumerate() {
            self.eye.apply(eye);
            if let Some(over) = self.per_eye.get(i) {
                over.apply(eye);
            }
        }
    }
}
