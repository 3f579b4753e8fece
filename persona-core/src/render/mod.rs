//! Column scheduling
//!
//! The polar renderer draws one display column at a time and hands it
//! to the link. [`ColumnScheduler`] decides which eye gets the next
//! column, honouring the pipeline gate and busy links.

use persona_hal::EyeLink;

use crate::eye::{EyeRig, DISPLAY_SIZE};
use crate::reload::PipelineGate;

/// A column the renderer should draw and send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColumnJob {
    /// Eye index in the rig
    pub eye: usize,
    /// Column to draw (0..DISPLAY_SIZE)
    pub column: u16,
    /// First column of a new frame; gaze and blink advance here
    pub new_frame: bool,
}

/// Round-robin column scheduler
#[derive(Debug, Default)]
pub struct ColumnScheduler {
    frames: u32,
    next_eye: usize,
}

impl ColumnScheduler {
    pub const fn new() -> Self {
        Self {
            frames: 0,
            next_eye: 0,
        }
    }

    /// Frames started on the first eye since boot
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Pick the next column to render
    ///
    /// Returns `None` while the gate is closed or every link is busy.
    pub fn poll<L: EyeLink, const N: usize>(
        &mut self,
        rig: &mut EyeRig<L, N>,
        gate: &PipelineGate,
    ) -> Option<ColumnJob> {
        if !gate.is_open() {
            return None;
        }

        for step in 0..N {
            let e = (self.next_eye + step) % N;
            let eye = &mut rig.eyes[e];
            if eye.link.is_busy() {
                continue;
            }

            let new_frame = eye.col_num >= DISPLAY_SIZE;
            if new_frame {
                eye.col_num = 0;
                eye.col_idx = 0;
                if e == 0 {
                    self.frames = self.frames.wrapping_add(1);
                }
            }

            let column = eye.col_num;
            eye.col_num += 1;
            eye.col_idx ^= 1;
            eye.column_ready = true;
            self.next_eye = (e + 1) % N;
            return Some(ColumnJob {
                eye: e,
                column,
                new_frame,
            });
        }

        None
    }
}
