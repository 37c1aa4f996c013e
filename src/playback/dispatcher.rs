use crate::core::InstructionTrigger;

/// Tracks which instruction triggers already fired in the current pass
#[derive(Debug, Clone, Default)]
pub struct InstructionDispatcher {
    pointer: usize,
}

impl InstructionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next trigger that has not fired yet
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Rewind to the first trigger, at the start of each pass
    pub fn reset(&mut self) {
        self.pointer = 0;
    }

    /// Return every not-yet-fired trigger whose index is at or before
    /// `segment_index`, in order, and mark them fired.
    pub fn check_triggers<'a>(
        &mut self,
        triggers: &'a [InstructionTrigger],
        segment_index: usize,
    ) -> &'a [InstructionTrigger] {
        let first = self.pointer.min(triggers.len());
        while self.pointer < triggers.len() && triggers[self.pointer].index <= segment_index {
            self.pointer += 1;
        }
        &triggers[first..self.pointer.min(triggers.len())]
    }
}
