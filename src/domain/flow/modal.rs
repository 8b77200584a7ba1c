//! ModalOrchestrator - transient overlays on top of the current phase.
//!
//! Two overlays exist: the auth prompt and the exit confirmation. Each is a
//! tiny `Closed → Open → Closed` state machine. Opening or closing an overlay
//! never touches the phase or the navigation history; the controller decides
//! what, if anything, happens after an overlay resolves.
//!
//! The two overlays are independent. Nothing prevents both from being open
//! at once; renderers pick which one to stack on top.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::foundation::{Checkpoint, StateMachine};

/// The overlays the flow knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    Auth,
    Exit,
}

/// Lifecycle of a single overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open)
    }
}

impl StateMachine for ModalState {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (ModalState::Closed, ModalState::Open) | (ModalState::Open, ModalState::Closed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ModalState::Closed => vec![ModalState::Open],
            ModalState::Open => vec![ModalState::Closed],
        }
    }
}

/// What renderers need to draw the overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModalVisibility {
    pub auth: bool,
    pub exit: bool,
}

/// A transition that was blocked on authentication and will be replayed once
/// the user signs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "checkpoint", rename_all = "snake_case")]
pub enum PendingTransition {
    /// Resume wherever progress says.
    ContinueFlow,
    /// Jump to a specific layer's selection phase.
    GoToLayer(Checkpoint),
}

/// Owns both overlays and the continuation parked behind the auth prompt.
#[derive(Debug, Clone, Default)]
pub struct ModalOrchestrator {
    auth: ModalState,
    exit: ModalState,
    pending: Option<PendingTransition>,
    auth_error: Option<String>,
}

impl ModalOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&self) -> ModalVisibility {
        ModalVisibility {
            auth: self.auth.is_open(),
            exit: self.exit.is_open(),
        }
    }

    pub fn state(&self, kind: ModalKind) -> ModalState {
        match kind {
            ModalKind::Auth => self.auth,
            ModalKind::Exit => self.exit,
        }
    }

    /// The continuation waiting on the auth prompt.
    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    /// Inline error shown inside the auth prompt.
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// Opens the auth prompt and parks `pending` behind it.
    ///
    /// If the prompt is already open, the newer continuation replaces the
    /// older one: the user's latest intent wins.
    pub fn open_auth(&mut self, pending: PendingTransition) {
        open(&mut self.auth);
        if let Some(previous) = self.pending.replace(pending) {
            debug!(?previous, ?pending, "Replacing pending auth continuation");
        }
        self.auth_error = None;
    }

    /// Closes the auth prompt without running anything.
    ///
    /// Returns the continuation that was dropped, if any.
    pub fn cancel_auth(&mut self) -> Option<PendingTransition> {
        close(&mut self.auth);
        self.auth_error = None;
        self.pending.take()
    }

    /// Closes the auth prompt after a successful sign-in and hands back the
    /// continuation to replay.
    pub fn resolve_auth(&mut self) -> Option<PendingTransition> {
        close(&mut self.auth);
        self.auth_error = None;
        self.pending.take()
    }

    /// Records a login/registration failure.
    ///
    /// The prompt stays open and the continuation stays parked. Ignored when
    /// the prompt is closed.
    pub fn record_auth_error(&mut self, message: impl Into<String>) -> bool {
        if !self.auth.is_open() {
            return false;
        }
        self.auth_error = Some(message.into());
        true
    }

    pub fn open_exit(&mut self) {
        open(&mut self.exit);
    }

    /// Closes the exit confirmation; returns false if it was not open.
    pub fn close_exit(&mut self) -> bool {
        close(&mut self.exit)
    }
}

fn open(state: &mut ModalState) -> bool {
    match state.transition_to(ModalState::Open) {
        Ok(next) => {
            *state = next;
            true
        }
        Err(_) => false,
    }
}

fn close(state: &mut ModalState) -> bool {
    match state.transition_to(ModalState::Closed) {
        Ok(next) => {
            *state = next;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modal_state_alternates_between_open_and_closed() {
        assert!(ModalState::Closed.can_transition_to(&ModalState::Open));
        assert!(ModalState::Open.can_transition_to(&ModalState::Closed));
        assert!(ModalState::Open.transition_to(ModalState::Open).is_err());
        assert!(!ModalState::Closed.is_terminal());
    }

    #[test]
    fn starts_with_everything_closed() {
        let modals = ModalOrchestrator::new();
        assert_eq!(modals.visibility(), ModalVisibility::default());
        assert_eq!(modals.pending(), None);
    }

    #[test]
    fn open_auth_parks_continuation() {
        let mut modals = ModalOrchestrator::new();
        modals.open_auth(PendingTransition::ContinueFlow);

        assert!(modals.visibility().auth);
        assert_eq!(modals.state(ModalKind::Auth), ModalState::Open);
        assert_eq!(modals.pending(), Some(PendingTransition::ContinueFlow));
    }

    #[test]
    fn reopening_auth_replaces_continuation() {
        let mut modals = ModalOrchestrator::new();
        modals.open_auth(PendingTransition::ContinueFlow);
        modals.open_auth(PendingTransition::GoToLayer(Checkpoint::Q3));

        assert!(modals.visibility().auth);
        assert_eq!(
            modals.pending(),
            Some(PendingTransition::GoToLayer(Checkpoint::Q3))
        );
    }

    #[test]
    fn cancel_drops_continuation() {
        let mut modals = ModalOrchestrator::new();
        modals.open_auth(PendingTransition::ContinueFlow);

        assert_eq!(modals.cancel_auth(), Some(PendingTransition::ContinueFlow));
        assert!(!modals.visibility().auth);
        assert_eq!(modals.resolve_auth(), None);
    }

    #[test]
    fn resolve_hands_back_continuation_once() {
        let mut modals = ModalOrchestrator::new();
        modals.open_auth(PendingTransition::GoToLayer(Checkpoint::Q2));

        assert_eq!(
            modals.resolve_auth(),
            Some(PendingTransition::GoToLayer(Checkpoint::Q2))
        );
        assert_eq!(modals.resolve_auth(), None);
    }

    #[test]
    fn auth_error_keeps_prompt_open_and_continuation_parked() {
        let mut modals = ModalOrchestrator::new();
        modals.open_auth(PendingTransition::ContinueFlow);

        assert!(modals.record_auth_error("Invalid email or password"));
        assert!(modals.visibility().auth);
        assert_eq!(modals.auth_error(), Some("Invalid email or password"));
        assert_eq!(modals.pending(), Some(PendingTransition::ContinueFlow));

        modals.resolve_auth();
        assert_eq!(modals.auth_error(), None);
    }

    #[test]
    fn auth_error_ignored_when_prompt_closed() {
        let mut modals = ModalOrchestrator::new();
        assert!(!modals.record_auth_error("nope"));
        assert_eq!(modals.auth_error(), None);
    }

    #[test]
    fn both_overlays_may_be_open_together() {
        let mut modals = ModalOrchestrator::new();
        modals.open_exit();
        modals.open_auth(PendingTransition::ContinueFlow);

        assert_eq!(
            modals.visibility(),
            ModalVisibility {
                auth: true,
                exit: true
            }
        );
    }

    #[test]
    fn close_exit_reports_whether_it_was_open() {
        let mut modals = ModalOrchestrator::new();
        assert!(!modals.close_exit());
        modals.open_exit();
        assert!(modals.close_exit());
        assert!(!modals.visibility().exit);
    }
}
