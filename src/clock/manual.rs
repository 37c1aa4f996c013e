use async_trait::async_trait;
use std::collections::VecDeque;

use crate::clock::ClockSource;

/// Clock that hands out a fixed list of timestamps
///
/// Lets tests drive a whole session deterministically without waiting on
/// real time.
pub struct ManualClock {
    ticks: VecDeque<f64>,
    delivered: usize,
}

impl ManualClock {
    pub fn new(ticks: impl IntoIterator<Item = f64>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
            delivered: 0,
        }
    }

    /// `count` ticks spaced `step_ms` apart, starting at 0
    pub fn every(step_ms: f64, count: usize) -> Self {
        Self::new((0..count).map(|i| i as f64 * step_ms))
    }

    /// Add more ticks after the scripted ones
    pub fn push(&mut self, timestamp: f64) {
        self.ticks.push_back(timestamp);
    }

    /// How many ticks were consumed
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

#[async_trait]
impl ClockSource for ManualClock {
    async fn next_frame(&mut self) -> Option<f64> {
        let tick = self.ticks.pop_front()?;
        self.delivered += 1;
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_replays_ticks() {
        let mut clock = ManualClock::every(1000.0, 3);
        clock.push(5000.0);

        assert_eq!(clock.next_frame().await, Some(0.0));
        assert_eq!(clock.next_frame().await, Some(1000.0));
        assert_eq!(clock.next_frame().await, Some(2000.0));
        assert_eq!(clock.next_frame().await, Some(5000.0));
        assert_eq!(clock.next_frame().await, None);
        assert_eq!(clock.delivered(), 4);
        assert_eq!(clock.remaining(), 0);
    }
}
