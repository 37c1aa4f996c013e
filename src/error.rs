use thiserror::Error;

use crate::playback::PlaybackState;

/// Errors surfaced by the playback engine and its components
///
/// All of these are recoverable: the rejected operation leaves the engine
/// untouched and the caller decides how to tell the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Playback was requested before any route was computed
    #[error("Please calculate a route first")]
    NoRoute,

    /// Speed below the 5 km/h floor or not a whole number
    #[error("Invalid speed '{0}': expected a whole number of km/h, at least 5")]
    InvalidSpeed(String),

    /// A route with zero coordinates
    #[error("Route has no coordinates")]
    EmptyRoute,

    /// Latitude/longitude not finite or outside [-90, 90] / [-180, 180]
    #[error("Coordinate {position} is not a valid latitude/longitude")]
    InvalidCoordinate { position: usize },

    /// Route replaced while playback was paused; the old cursor is gone
    #[error("Route was replaced, start playback again")]
    RouteReplaced,

    /// Trigger pointing past the last coordinate
    #[error("Instruction {position} targets coordinate {index}, but the route only has {len}")]
    TriggerOutOfRange {
        position: usize,
        index: usize,
        len: usize,
    },

    /// Trigger indices must be non-decreasing
    #[error("Instruction {position} (index {index}) comes before the previous instruction (index {previous})")]
    TriggersOutOfOrder {
        position: usize,
        index: usize,
        previous: usize,
    },

    /// pause() outside Running, resume() outside Paused
    #[error("Cannot {operation} while {state:?}")]
    InvalidTransition {
        operation: &'static str,
        state: PlaybackState,
    },
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;
