//! AuthGate - guards phase transitions behind an authenticated session.

use tracing::info;

use super::{ModalOrchestrator, PendingTransition};
use crate::domain::foundation::AuthenticatedUser;

/// The session the flow runs under.
///
/// Injected into the controller; there is no ambient "current user".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    user: Option<AuthenticatedUser>,
}

impl AuthSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: AuthenticatedUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn sign_in(&mut self, user: AuthenticatedUser) {
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) -> Option<AuthenticatedUser> {
        self.user.take()
    }
}

/// Result of passing an action through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome<T> {
    /// The session was present and the action ran.
    Allowed(T),
    /// No session: the auth prompt was opened and the action did not run.
    Blocked,
}

impl<T> GateOutcome<T> {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateOutcome::Allowed(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, GateOutcome::Blocked)
    }

    pub fn allowed(self) -> Option<T> {
        match self {
            GateOutcome::Allowed(value) => Some(value),
            GateOutcome::Blocked => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> GateOutcome<U> {
        match self {
            GateOutcome::Allowed(value) => GateOutcome::Allowed(f(value)),
            GateOutcome::Blocked => GateOutcome::Blocked,
        }
    }
}

/// Anything the gate can guard: it exposes a session and the overlays.
pub trait GatedFlow {
    fn session(&self) -> &AuthSession;
    fn modals_mut(&mut self) -> &mut ModalOrchestrator;
}

/// Stateless guard over a [`GatedFlow`].
pub struct AuthGate;

impl AuthGate {
    /// Runs `action` if the flow has a session; otherwise opens the auth
    /// prompt with `pending` parked behind it and returns `Blocked`.
    pub fn require_auth<C, T, F>(flow: &mut C, pending: PendingTransition, action: F) -> GateOutcome<T>
    where
        C: GatedFlow,
        F: FnOnce(&mut C) -> T,
    {
        if flow.session().is_authenticated() {
            return GateOutcome::Allowed(action(flow));
        }

        info!(?pending, "Authentication required, opening auth prompt");
        flow.modals_mut().open_auth(pending);
        GateOutcome::Blocked
    }
}
