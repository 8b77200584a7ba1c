//! ProgressTracker - derived progress over responses and completion.
//!
//! Everything here is a pure function of the current [`ResponseSet`] and
//! [`CheckpointCompletion`]; nothing is cached, so a read always reflects
//! the latest mutation.

use crate::domain::foundation::{Checkpoint, Percentage};

use super::{CheckpointCompletion, Phase, ResponseSet};

/// Read-only progress view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowProgress {
    completion: CheckpointCompletion,
    has_responses: bool,
}

impl FlowProgress {
    pub fn new(responses: &ResponseSet, completion: CheckpointCompletion) -> Self {
        Self {
            completion,
            has_responses: !responses.is_empty(),
        }
    }

    pub fn completed(&self, checkpoint: Checkpoint) -> bool {
        self.completion.is_completed(checkpoint)
    }

    pub fn completed_checkpoints(&self) -> Vec<Checkpoint> {
        self.completion.completed()
    }

    /// round(100 × completed / 3): 0, 33, 67 or 100.
    pub fn percentage(&self) -> Percentage {
        Percentage::from_ratio(self.completion.count(), Checkpoint::all().len())
    }

    /// True once any checkpoint is complete or any response is recorded.
    pub fn has_started(&self) -> bool {
        self.completion.any() || self.has_responses
    }

    pub fn is_complete(&self) -> bool {
        self.completion.all()
    }

    pub fn resume_phase(&self) -> Phase {
        resume_phase(&self.completion)
    }

    pub fn continue_target(&self) -> Phase {
        continue_target(self)
    }
}

/// Earliest selection phase whose checkpoint is incomplete, or `Summary`.
pub fn resume_phase(completion: &CheckpointCompletion) -> Phase {
    completion
        .first_incomplete()
        .map(Phase::selection)
        .unwrap_or(Phase::Summary)
}

/// Where "continue" lands an authenticated user.
///
/// Shared by the direct path and the replay after a successful sign-in, so
/// both always agree.
pub fn continue_target(progress: &FlowProgress) -> Phase {
    if progress.is_complete() {
        Phase::Summary
    } else if progress.has_started() {
        progress.resume_phase()
    } else {
        Phase::Q1Selection
    }
}
