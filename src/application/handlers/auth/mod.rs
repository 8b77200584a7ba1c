//! Auth overlay handlers.
//!
//! Both handlers talk to the authentication collaborator and resolve the
//! auth overlay on success. On failure the overlay stays open with an inline
//! message and the parked continuation is kept.
//!
//! A user who started anonymously may already have stored progress. It is
//! loaded for the tracked question and merged in before the continuation
//! replays.

mod login;
mod register;

pub use login::LoginHandler;
pub use register::RegisterHandler;

use thiserror::Error;
use tracing::warn;

use crate::application::{FlowController, FlowSeed};
use crate::domain::flow::{FlowError, Phase};
use crate::domain::foundation::{AuthError, AuthenticatedUser, DomainError};
use crate::ports::ProgressStore;

/// Result of a successful sign-in from the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthModalOutcome {
    pub user: AuthenticatedUser,
    /// Phase the parked continuation landed on, if one was parked.
    pub resumed_at: Option<Phase>,
}

/// Errors from the auth overlay handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthModalError {
    /// The collaborator rejected the attempt; shown inline.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Stored progress could not be read; the overlay stays open.
    #[error("Failed to load stored progress: {0}")]
    Storage(#[from] DomainError),

    /// Signed in, but replaying the continuation failed.
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// Loads the user's stored progress and resolves the overlay with it.
async fn complete_sign_in(
    store: &dyn ProgressStore,
    controller: &mut FlowController,
    user: AuthenticatedUser,
) -> Result<AuthModalOutcome, AuthModalError> {
    let question_id = controller.question_id().cloned();
    let stored = match question_id {
        Some(question_id) => match store.load(&user.id, &question_id).await {
            Ok(snapshot) => snapshot.map(FlowSeed::from),
            Err(err) => {
                warn!(user_id = %user.id, error = %err, "Could not load stored progress");
                controller.on_auth_modal_error(&AuthError::service_unavailable(err.to_string()));
                return Err(err.into());
            }
        },
        None => None,
    };

    let resumed_at = controller.on_auth_modal_success_with_seed(user.clone(), stored)?;
    Ok(AuthModalOutcome { user, resumed_at })
}
