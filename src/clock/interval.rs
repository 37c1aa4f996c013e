use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::clock::ClockSource;

/// Default frame interval, roughly a 60 Hz display
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Wall-clock ticks at a fixed cadence, timestamps relative to creation
pub struct IntervalClock {
    interval: Interval,
    origin: Instant,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        debug!("Interval clock every {:?}", period);

        let origin = Instant::now();
        let mut interval = time::interval_at(origin, period);
        // A late frame is fine; a burst of catch-up frames is not
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self { interval, origin }
    }
}

#[async_trait]
impl ClockSource for IntervalClock {
    async fn next_frame(&mut self) -> Option<f64> {
        let tick = self.interval.tick().await;
        Some(tick.duration_since(self.origin).as_secs_f64() * 1000.0)
    }
}
