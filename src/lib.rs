//! Route playback: move a simulated vehicle along a computed route at a
//! real-world speed, with pause/resume, endless looping and turn-by-turn
//! narration as instruction points are passed.
//!
//! The engine ([`PlaybackEngine`]) is a plain state machine stepped once per
//! clock tick. Everything around it (the clock, the map marker, the speech
//! output, the routing service) plugs in through small traits and channels.

pub mod clock;
pub mod core;
pub mod error;
pub mod input;
pub mod playback;
pub mod session;
pub mod settings;
pub mod sink;

pub use crate::core::{Coordinate, InstructionTrigger, Route};
pub use error::{PlaybackError, PlaybackResult};
pub use playback::{PlaybackEngine, PlaybackState, RouteBuffer, SpeedController};
