//! Command handling
//!
//! Two strategies share one [`CommandHandler`] interface:
//!
//! - [`MoodController`]: interactive live reloads through the orchestrator
//! - [`StyleCycler`]: persisted style choice applied by a warm restart,
//!   with an optional two-minute autonomous cycle
//!
//! The firmware picks one at build time. Handlers never touch the rig;
//! they leave a [`Request`] for the render loop to act on.

pub mod mood;
pub mod style;

pub use mood::MoodController;
pub use style::{StyleCycler, CYCLE_PERIOD_MS};

use persona_protocol::ReplySink;

use crate::registry::{Persona, Registry, MOODS};

/// Live values reported by `STATUS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Frames rendered since boot
    pub frames: u32,
    /// Free heap in bytes
    pub free_ram: usize,
    /// Monotonic time in milliseconds
    pub now_ms: u32,
}

/// Work a handler asks the render loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// Hot-reload this persona
    Reload(&'static Persona),
    /// Warm-restart the device (the new style is already persisted)
    Restart,
}

/// A command strategy
pub trait CommandHandler {
    /// Print the boot banner and start any timers
    fn banner(&mut self, now_ms: u32, out: &mut dyn ReplySink);

    /// Handle one complete input line
    fn handle(&mut self, line: &str, telemetry: &Telemetry, out: &mut dyn ReplySink);

    /// Advance timers
    fn poll(&mut self, now_ms: u32, out: &mut dyn ReplySink);

    /// Take the pending request, if any
    fn take_request(&mut self) -> Option<Request>;

    /// Check if a request is waiting
    fn pending(&self) -> bool;

    /// Active persona
    fn current(&self) -> &'static Persona;

    /// Bundle to load at power-up
    fn boot_bundle(&self) -> &'static str {
        self.current().bundle
    }
}

/// Persona at `index`, falling back to the first entry
fn persona_at(registry: &Registry, index: usize) -> &'static Persona {
    registry
        .get(index)
        .or_else(|| registry.get(0))
        .unwrap_or(&MOODS[0])
}
