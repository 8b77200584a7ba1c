//! RegisterHandler - creates an account from the auth overlay.

use std::sync::Arc;

use super::{complete_sign_in, AuthModalError, AuthModalOutcome};
use crate::application::FlowController;
use crate::domain::foundation::{AuthError, Registration};
use crate::ports::{AuthClient, ProgressStore};

/// Handler for the overlay's sign-up form.
pub struct RegisterHandler {
    auth: Arc<dyn AuthClient>,
    store: Arc<dyn ProgressStore>,
}

impl RegisterHandler {
    pub fn new(auth: Arc<dyn AuthClient>, store: Arc<dyn ProgressStore>) -> Self {
        Self { auth, store }
    }

    pub async fn handle(
        &self,
        controller: &mut FlowController,
        registration: Registration,
    ) -> Result<AuthModalOutcome, AuthModalError> {
        // Field errors never reach the collaborator.
        let attempt = match registration.validate() {
            Ok(()) => self.auth.register(&registration).await,
            Err(invalid) => Err(AuthError::from(invalid)),
        };
        let user = match attempt {
            Ok(user) => user,
            Err(err) => {
                controller.on_auth_modal_error(&err);
                return Err(err.into());
            }
        };

        complete_sign_in(self.store.as_ref(), controller, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryProgressStore, MockAuthClient, RecordingRouter};
    use crate::application::{FlowOptions, FlowSeed};
    use crate::domain::flow::{AuthSession, CheckpointCompletion, Phase, ResponseSet};
    use crate::domain::foundation::Checkpoint;

    fn setup(auth: MockAuthClient) -> (RegisterHandler, Arc<MockAuthClient>, FlowController) {
        let auth = Arc::new(auth);
        let flow = FlowController::new(
            AuthSession::anonymous(),
            Arc::new(RecordingRouter::new()),
            FlowOptions::default(),
        )
        .with_seed(FlowSeed {
            responses: ResponseSet::new(),
            completion: CheckpointCompletion::from_completed(Checkpoint::all().iter().copied()),
        });
        (
            RegisterHandler::new(auth.clone(), Arc::new(InMemoryProgressStore::new())),
            auth,
            flow,
        )
    }

    #[tokio::test]
    async fn registration_signs_in_and_replays_to_summary() {
        let (handler, _, mut flow) = setup(MockAuthClient::new());
        flow.continue_flow().unwrap();

        let outcome = handler
            .handle(
                &mut flow,
                Registration::new("grace@example.com", "long-password", Some("Grace".into())),
            )
            .await
            .unwrap();

        assert_eq!(outcome.resumed_at, Some(Phase::Summary));
        assert_eq!(outcome.user.display_name_or_email(), "Grace");
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected_locally() {
        let (handler, auth, mut flow) = setup(MockAuthClient::new());
        flow.continue_flow().unwrap();

        let err = handler
            .handle(&mut flow, Registration::new("grace", "long-password", None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AuthModalError::Auth(AuthError::InvalidRegistration(_))
        ));
        assert_eq!(auth.account_count().await, 0);
        assert!(flow.auth_error().is_some());
        assert_eq!(flow.current_phase(), Phase::Main);
    }

    #[tokio::test]
    async fn service_outage_shows_friendly_message() {
        let (handler, _, mut flow) =
            setup(MockAuthClient::new().with_error(AuthError::service_unavailable("503")));
        flow.continue_flow().unwrap();

        let _ = handler
            .handle(&mut flow, Registration::new("grace@example.com", "long-password", None))
            .await;

        assert_eq!(
            flow.auth_error(),
            Some("Sign-in is temporarily unavailable. Please try again.")
        );
    }
}
