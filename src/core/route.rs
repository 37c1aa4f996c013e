use serde::{Deserialize, Serialize};

use crate::core::Coordinate;
use crate::error::{PlaybackError, PlaybackResult};

/// Narrate `text` once the cursor reaches coordinate `index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionTrigger {
    /// Index into the route's coordinates
    pub index: usize,

    /// Instruction text, e.g. "Turn left onto Königstraße"
    pub text: String,
}

impl InstructionTrigger {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// A validated, immutable route
///
/// Always holds at least one coordinate, and trigger indices are
/// non-decreasing and within `0..coordinates.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    coordinates: Vec<Coordinate>,
    triggers: Vec<InstructionTrigger>,
}

impl Route {
    pub fn new(coordinates: Vec<Coordinate>, triggers: Vec<InstructionTrigger>) -> PlaybackResult<Self> {
        if coordinates.is_empty() {
            return Err(PlaybackError::EmptyRoute);
        }

        if let Some(position) = coordinates.iter().position(|c| !c.is_valid()) {
            return Err(PlaybackError::InvalidCoordinate { position });
        }

        let len = coordinates.len();
        let mut previous = 0;
        for (position, trigger) in triggers.iter().enumerate() {
            if trigger.index >= len {
                return Err(PlaybackError::TriggerOutOfRange {
                    position,
                    index: trigger.index,
                    len,
                });
            }
            if trigger.index < previous {
                return Err(PlaybackError::TriggersOutOfOrder {
                    position,
                    index: trigger.index,
                    previous,
                });
            }
            previous = trigger.index;
        }

        Ok(Self { coordinates, triggers })
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn triggers(&self) -> &[InstructionTrigger] {
        &self.triggers
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Always false for a constructed route
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn start(&self) -> Coordinate {
        self.coordinates[0]
    }

    /// Total length of one pass in meters, start to finish
    pub fn length_m(&self) -> f64 {
        self.coordinates
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}
