//! Render pipeline gate
//!
//! The column scheduler checks the gate before starting a transfer. A
//! reload holds a [`Suspension`] for its whole duration; dropping the
//! guard reopens the pipeline on every exit path.

use core::sync::atomic::{AtomicBool, Ordering};

/// Open/closed flag shared between the scheduler and the reload path
#[derive(Debug)]
pub struct PipelineGate {
    open: AtomicBool,
}

impl PipelineGate {
    /// Create an open gate
    pub const fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
        }
    }

    /// Check if new transfers may start
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Close the gate until the returned guard is dropped
    pub fn suspend(&self) -> Suspension<'_> {
        self.open.store(false, Ordering::Release);
        Suspension { gate: self }
    }
}

impl Default for PipelineGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the pipeline closed while alive
#[must_use = "the pipeline reopens as soon as the suspension is dropped"]
pub struct Suspension<'a> {
    gate: &'a PipelineGate,
}

impl Drop for Suspension<'_> {
    fn drop(&mut self) {
        self.gate.open.store(true, Ordering::Release);
    }
}
