//! Events recorded by the flow controller.

use serde::{Deserialize, Serialize};

use super::{PendingTransition, Phase, ResponseKey, TransitionKind};
use crate::domain::foundation::{Checkpoint, Timestamp};

/// Something that happened in the flow, for hosts that want to react to it
/// (analytics, autosave triggers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FlowEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
        kind: TransitionKind,
    },
    ResponseSaved {
        key: ResponseKey,
    },
    CheckpointCompleted {
        checkpoint: Checkpoint,
    },
    ResponsesCleared,
    AuthRequired {
        pending: PendingTransition,
    },
    /// The user confirmed leaving the flow entirely.
    FlowExited {
        route: String,
    },
}

impl FlowEvent {
    /// Stable name used in logs and analytics.
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::PhaseChanged { .. } => "flow.phase_changed",
            FlowEvent::ResponseSaved { .. } => "flow.response_saved",
            FlowEvent::CheckpointCompleted { .. } => "flow.checkpoint_completed",
            FlowEvent::ResponsesCleared => "flow.responses_cleared",
            FlowEvent::AuthRequired { .. } => "flow.auth_required",
            FlowEvent::FlowExited { .. } => "flow.exited",
        }
    }

    /// True for events that change what should be persisted.
    pub fn affects_progress(&self) -> bool {
        matches!(
            self,
            FlowEvent::ResponseSaved { .. }
                | FlowEvent::CheckpointCompleted { .. }
                | FlowEvent::ResponsesCleared
        )
    }
}

/// An event with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event: FlowEvent,
    pub occurred_at: Timestamp,
}

impl RecordedEvent {
    pub fn now(event: FlowEvent) -> Self {
        Self {
            event,
            occurred_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_events_are_flagged() {
        assert!(FlowEvent::ResponsesCleared.affects_progress());
        assert!(FlowEvent::CheckpointCompleted {
            checkpoint: Checkpoint::Q1
        }
        .affects_progress());
        assert!(!FlowEvent::AuthRequired {
            pending: PendingTransition::ContinueFlow
        }
        .affects_progress());
    }

    #[test]
    fn serializes_with_event_tag() {
        let event = FlowEvent::PhaseChanged {
            from: Phase::Main,
            to: Phase::Q1Selection,
            kind: TransitionKind::Resume,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "phase_changed");
        assert_eq!(json["to"], "q1_selection");
        assert_eq!(event.name(), "flow.phase_changed");
    }
}
