use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::Coordinate;
use crate::sink::{NarrationSink, PlaybackEvent, RenderSink};

/// Sink that records everything it receives, for tests and headless runs
///
/// Clones share the same log, so a test can hand one clone to the engine
/// and inspect the other.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<PlaybackEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.lock().clone()
    }

    pub fn positions(&self) -> Vec<Coordinate> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                PlaybackEvent::Position(position) => Some(*position),
                _ => None,
            })
            .collect()
    }

    pub fn narrations(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                PlaybackEvent::Narration { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_position(&self) -> Option<Coordinate> {
        self.positions().last().copied()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PlaybackEvent>> {
        // Poisoned by a panicking holder; the log itself is still intact
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RenderSink for RecordingSink {
    fn set_position(&mut self, position: Coordinate) {
        self.lock().push(PlaybackEvent::Position(position));
    }
}

impl NarrationSink for RecordingSink {
    fn narrate(&mut self, text: &str) {
        self.lock().push(PlaybackEvent::narration(text));
    }
}
