//! Flow module - phases, progress, auth gating and overlays.
//!
//! These are the building blocks the `FlowController` composes:
//!
//! - [`Phase`] / [`PhaseSequence`] / [`TransitionKind`]: where the user is
//!   and which moves are legal
//! - [`ResponseSet`] / [`CheckpointCompletion`]: what the user has answered
//! - [`FlowProgress`]: derived progress and the resume rule
//! - [`AuthGate`]: guard that parks transitions behind the auth prompt
//! - [`ModalOrchestrator`]: the auth and exit overlays

mod auth_gate;
mod completion;
mod errors;
mod events;
mod modal;
mod phase;
mod progress;
mod responses;
mod snapshot;

pub use auth_gate::{AuthGate, AuthSession, GateOutcome, GatedFlow};
pub use completion::CheckpointCompletion;
pub use errors::FlowError;
pub use events::{FlowEvent, RecordedEvent};
pub use modal::{ModalKind, ModalOrchestrator, ModalState, ModalVisibility, PendingTransition};
pub use phase::{Phase, PhaseSequence, TransitionKind};
pub use progress::{continue_target, resume_phase, FlowProgress};
pub use responses::{ResponseKey, ResponseSet, ResponseValue};
pub use snapshot::FlowSnapshot;
