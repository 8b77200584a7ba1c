//! Checkpoint completion map.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Checkpoint;

/// Which checkpoints the user has completed.
///
/// # Invariants
///
/// - Monotonic: a completed checkpoint stays completed. The only way back to
///   `false` is [`CheckpointCompletion::reset`], used by "clear responses".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckpointCompletion {
    #[serde(default)]
    q1: bool,
    #[serde(default)]
    q2: bool,
    #[serde(default)]
    q3: bool,
}

impl CheckpointCompletion {
    /// Nothing completed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a completion map with the given checkpoints completed.
    pub fn from_completed<I>(checkpoints: I) -> Self
    where
        I: IntoIterator<Item = Checkpoint>,
    {
        let mut completion = Self::new();
        for cp in checkpoints {
            completion.mark(cp);
        }
        completion
    }

    /// Returns true if the checkpoint is completed.
    pub fn is_completed(&self, checkpoint: Checkpoint) -> bool {
        match checkpoint {
            Checkpoint::Q1 => self.q1,
            Checkpoint::Q2 => self.q2,
            Checkpoint::Q3 => self.q3,
        }
    }

    /// Marks a checkpoint completed; returns true if it was not before.
    pub fn mark(&mut self, checkpoint: Checkpoint) -> bool {
        let slot = match checkpoint {
            Checkpoint::Q1 => &mut self.q1,
            Checkpoint::Q2 => &mut self.q2,
            Checkpoint::Q3 => &mut self.q3,
        };
        let newly = !*slot;
        *slot = true;
        newly
    }

    /// Clears every checkpoint.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Completed checkpoints in canonical order.
    pub fn completed(&self) -> Vec<Checkpoint> {
        Checkpoint::all()
            .iter()
            .copied()
            .filter(|cp| self.is_completed(*cp))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.completed().len()
    }

    pub fn any(&self) -> bool {
        self.q1 || self.q2 || self.q3
    }

    pub fn all(&self) -> bool {
        self.q1 && self.q2 && self.q3
    }

    /// Earliest checkpoint not yet completed.
    pub fn first_incomplete(&self) -> Option<Checkpoint> {
        Checkpoint::all()
            .iter()
            .copied()
            .find(|cp| !self.is_completed(*cp))
    }
}
