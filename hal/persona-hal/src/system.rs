//! System services: monotonic time and memory telemetry

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since boot (wraps after ~49 days)
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `since`, wrap-safe
    fn elapsed_ms(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

/// Runtime memory information
pub trait SystemInfo {
    /// Bytes currently free on the heap
    fn available_memory(&self) -> usize;
}
