//! Hot reload
//!
//! Swaps the active persona while the display pipeline is live. The
//! [`Orchestrator`] runs the whole swap as one linear pass that always
//! completes; anything that degraded is reported in a [`ReloadReport`].

pub mod drain;
pub mod gate;
pub mod orchestrator;

pub use drain::{drain, DrainOutcome, DRAIN_TIMEOUT_MS};
pub use gate::{PipelineGate, Suspension};
pub use orchestrator::{
    GeometryPolicy, Orchestrator, ReloadReport, SlotResolution, DEFAULT_STACK_RESERVE,
};
