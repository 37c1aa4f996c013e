use tokio::sync::mpsc;
use tracing::trace;

use crate::core::Coordinate;
use crate::sink::{NarrationSink, PlaybackEvent, RenderSink};

/// Forwards engine output onto a channel for another task to consume
///
/// A closed receiver is not an error: nobody is listening, so the event is
/// dropped.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<PlaybackEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with its receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn emit(&self, event: PlaybackEvent) {
        if self.tx.send(event).is_err() {
            trace!("Playback event dropped, receiver closed");
        }
    }
}

impl RenderSink for ChannelSink {
    fn set_position(&mut self, position: Coordinate) {
        self.emit(PlaybackEvent::Position(position));
    }
}

impl NarrationSink for ChannelSink {
    fn narrate(&mut self, text: &str) {
        self.emit(PlaybackEvent::narration(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_forwards_events() {
        let (mut sink, mut rx) = ChannelSink::channel();

        sink.set_position(Coordinate::new(49.45, 11.07));
        sink.narrate("Turn right");

        assert_eq!(rx.recv().await, Some(PlaybackEvent::Position(Coordinate::new(49.45, 11.07))));
        match rx.recv().await {
            Some(PlaybackEvent::Narration { text, .. }) => assert_eq!(text, "Turn right"),
            other => panic!("expected narration, got {:?}", other),
        }
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (mut sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.narrate("nobody listening");
    }
}
