//! ResumeFlowHandler - builds a controller for the current user.

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{FlowController, FlowOptions, FlowSeed};
use crate::domain::flow::AuthSession;
use crate::domain::foundation::{DomainError, QuestionId};
use crate::ports::{AuthClient, ProgressStore, Router};

/// A controller ready to render, plus whether stored progress was found.
pub struct ResumeFlowResult {
    pub controller: FlowController,
    pub restored: bool,
}

/// Handler that starts a flow session.
pub struct ResumeFlowHandler {
    auth: Arc<dyn AuthClient>,
    store: Arc<dyn ProgressStore>,
    router: Arc<dyn Router>,
    options: FlowOptions,
}

impl ResumeFlowHandler {
    pub fn new(
        auth: Arc<dyn AuthClient>,
        store: Arc<dyn ProgressStore>,
        router: Arc<dyn Router>,
        options: FlowOptions,
    ) -> Self {
        Self {
            auth,
            store,
            router,
            options,
        }
    }

    /// Starts a session on Main for `question_id`.
    ///
    /// A signed-in user gets their stored progress. An unreachable auth
    /// service starts the session anonymously; the auth overlay will ask
    /// again when it matters.
    pub async fn handle(&self, question_id: &QuestionId) -> Result<ResumeFlowResult, DomainError> {
        let user = match self.auth.current_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "Could not read current user, starting anonymously");
                None
            }
        };

        let (session, seed) = match user {
            Some(user) => {
                let stored = self.store.load(&user.id, question_id).await?;
                (AuthSession::authenticated(user), stored.map(FlowSeed::from))
            }
            None => (AuthSession::anonymous(), None),
        };

        let restored = seed.is_some();
        info!(
            %question_id,
            authenticated = session.is_authenticated(),
            restored,
            "Starting flow session"
        );

        let controller = FlowController::new(session, Arc::clone(&self.router), self.options.clone())
            .with_seed(seed.unwrap_or_default());
        Ok(ResumeFlowResult {
            controller,
            restored,
        })
    }
}
