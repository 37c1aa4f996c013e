pub mod interval;
pub mod manual;

pub use interval::IntervalClock;
pub use manual::ManualClock;

use async_trait::async_trait;

/// Per-refresh tick source driving playback
///
/// Implementations:
/// - `IntervalClock` ticks at a fixed display-refresh cadence
/// - `ManualClock` replays scripted timestamps for tests
#[async_trait]
pub trait ClockSource: Send {
    /// Wait for the next tick and return its timestamp in milliseconds.
    ///
    /// Timestamps never decrease. Returns None once the clock has no more
    /// ticks to give.
    async fn next_frame(&mut self) -> Option<f64>;
}
