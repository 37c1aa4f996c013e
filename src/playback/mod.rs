pub mod buffer;
pub mod dispatcher;
pub mod engine;
pub mod speed;

pub use buffer::{RouteBuffer, RouteWatch};
pub use dispatcher::InstructionDispatcher;
pub use engine::{advance, PlaybackEngine, Step};
pub use speed::SpeedController;

use crate::core::{Coordinate, Route};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
    Paused,
}

/// Where the vehicle is along the route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
    /// Index of the next coordinate the vehicle is heading for
    pub segment_index: usize,
    /// Interpolated marker position
    pub position: Coordinate,
    /// Meters covered since leaving the previous coordinate
    pub distance_into_segment: f64,
}

impl PlaybackCursor {
    pub fn at_start(route: &Route) -> Self {
        Self {
            segment_index: 0,
            position: route.start(),
            distance_into_segment: 0.0,
        }
    }
}

/// Read-only view of the engine, for status displays
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub cursor: Option<PlaybackCursor>,
    pub speed_kmh: u32,
    pub passes: u64,
    pub route_len: Option<usize>,
}

impl std::fmt::Display for PlaybackSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} at {} km/h", self.state, self.speed_kmh)?;
        match (self.route_len, &self.cursor) {
            (Some(len), Some(cursor)) => write!(
                f,
                ", heading for point {}/{} at ({:.6}, {:.6}), {} passes completed",
                cursor.segment_index, len, cursor.position.lat, cursor.position.lng, self.passes
            ),
            (Some(len), None) => write!(f, ", route of {} points loaded", len),
            (None, _) => write!(f, ", no route"),
        }
    }
}
