use tracing::debug;

use crate::error::{PlaybackError, PlaybackResult};

/// Lowest speed the controller accepts, in km/h
pub const MIN_SPEED_KMH: u32 = 5;

/// Increment/decrement step, in km/h
pub const SPEED_STEP_KMH: u32 = 5;

pub const DEFAULT_SPEED_KMH: u32 = 20;

/// Holds the target speed and its meters-per-second rate
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedController {
    speed_kmh: u32,
    rate: f64,
}

impl Default for SpeedController {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            rate: kmh_to_mps(DEFAULT_SPEED_KMH),
        }
    }
}

impl SpeedController {
    pub fn new(speed_kmh: u32) -> PlaybackResult<Self> {
        let mut controller = Self::default();
        controller.set_speed_kmh(speed_kmh)?;
        Ok(controller)
    }

    /// Current speed in km/h
    pub fn speed_kmh(&self) -> u32 {
        self.speed_kmh
    }

    /// Current rate in meters per second
    pub fn current_rate(&self) -> f64 {
        self.rate
    }

    /// Set the speed directly; rejects anything below the floor
    pub fn set_speed_kmh(&mut self, speed_kmh: u32) -> PlaybackResult<()> {
        if speed_kmh < MIN_SPEED_KMH {
            return Err(PlaybackError::InvalidSpeed(speed_kmh.to_string()));
        }
        self.store(speed_kmh);
        Ok(())
    }

    /// Set the speed from user text, e.g. the contents of a speed input box
    pub fn set_speed_from_input(&mut self, input: &str) -> PlaybackResult<u32> {
        let trimmed = input.trim();
        let speed_kmh = trimmed
            .parse::<u32>()
            .map_err(|_| PlaybackError::InvalidSpeed(trimmed.to_string()))?;
        self.set_speed_kmh(speed_kmh)?;
        Ok(speed_kmh)
    }

    pub fn increment(&mut self) -> u32 {
        self.store(self.speed_kmh.saturating_add(SPEED_STEP_KMH));
        self.speed_kmh
    }

    /// Step down, never below the floor
    pub fn decrement(&mut self) -> u32 {
        if self.speed_kmh > MIN_SPEED_KMH {
            self.store((self.speed_kmh - SPEED_STEP_KMH).max(MIN_SPEED_KMH));
        }
        self.speed_kmh
    }

    /// Human-readable speed, e.g. "20 km/h"
    pub fn display(&self) -> String {
        format!("{} km/h", self.speed_kmh)
    }

    fn store(&mut self, speed_kmh: u32) {
        self.speed_kmh = speed_kmh;
        self.rate = kmh_to_mps(speed_kmh);
        debug!("Speed set to {} km/h ({:.3} m/s)", speed_kmh, self.rate);
    }
}

fn kmh_to_mps(speed_kmh: u32) -> f64 {
    speed_kmh as f64 * 1000.0 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_speed() {
        let speed = SpeedController::default();
        assert_eq!(speed.speed_kmh(), 20);
        assert!((speed.current_rate() - 5.556).abs() < 0.001);
        assert_eq!(speed.display(), "20 km/h");
    }

    #[test]
    fn test_speed_floor() {
        let mut speed = SpeedController::default();
        assert_eq!(speed.set_speed_kmh(3), Err(PlaybackError::InvalidSpeed("3".to_string())));
        assert_eq!(speed.speed_kmh(), 20);

        speed.set_speed_kmh(5).unwrap();
        assert!((speed.current_rate() - 1.389).abs() < 0.001);
    }

    #[test]
    fn test_set_speed_from_input() {
        let mut speed = SpeedController::default();
        assert_eq!(speed.set_speed_from_input(" 35 "), Ok(35));
        assert_eq!(speed.speed_kmh(), 35);

        assert!(speed.set_speed_from_input("12.5").is_err());
        assert!(speed.set_speed_from_input("fast").is_err());
        assert!(speed.set_speed_from_input("4").is_err());
        assert_eq!(speed.speed_kmh(), 35);
    }

    #[test]
    fn test_increment_decrement() {
        let mut speed = SpeedController::new(10).unwrap();
        assert_eq!(speed.increment(), 15);
        assert_eq!(speed.decrement(), 10);
        assert_eq!(speed.decrement(), 5);
        // No-op at the floor
        assert_eq!(speed.decrement(), 5);
        assert!((speed.current_rate() - 5.0 / 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_decrement_clamps_to_floor() {
        let mut speed = SpeedController::new(7).unwrap();
        assert_eq!(speed.decrement(), 5);
    }
}
