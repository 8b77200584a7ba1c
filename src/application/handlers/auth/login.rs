//! LoginHandler - signs in from the auth overlay.

use std::sync::Arc;

use super::{complete_sign_in, AuthModalError, AuthModalOutcome};
use crate::application::FlowController;
use crate::domain::foundation::Credentials;
use crate::ports::{AuthClient, ProgressStore};

/// Handler for the overlay's login form.
pub struct LoginHandler {
    auth: Arc<dyn AuthClient>,
    store: Arc<dyn ProgressStore>,
}

impl LoginHandler {
    pub fn new(auth: Arc<dyn AuthClient>, store: Arc<dyn ProgressStore>) -> Self {
        Self { auth, store }
    }

    pub async fn handle(
        &self,
        controller: &mut FlowController,
        credentials: Credentials,
    ) -> Result<AuthModalOutcome, AuthModalError> {
        let user = match self.auth.login(&credentials).await {
            Ok(user) => user,
            Err(err) => {
                controller.on_auth_modal_error(&err);
                return Err(err.into());
            }
        };

        complete_sign_in(self.store.as_ref(), controller, user).await
    }
}
