pub mod channel;
pub mod recording;

pub use channel::ChannelSink;
pub use recording::RecordingSink;

use chrono::{DateTime, Utc};
use crate::core::Coordinate;

/// Something that draws the vehicle marker
///
/// Updates are fire-and-forget; the engine never waits on or inspects the
/// result.
pub trait RenderSink: Send {
    /// Move the marker to `position`
    fn set_position(&mut self, position: Coordinate);
}

/// Something that speaks instruction text, e.g. a text-to-speech backend
pub trait NarrationSink: Send {
    fn narrate(&mut self, text: &str);
}

/// Everything the engine emits, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Marker moved
    Position(Coordinate),

    /// Instruction reached
    Narration {
        text: String,
        at: DateTime<Utc>,
    },
}

impl PlaybackEvent {
    pub fn narration(text: &str) -> Self {
        PlaybackEvent::Narration {
            text: text.to_string(),
            at: Utc::now(),
        }
    }
}
