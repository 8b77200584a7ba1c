//! Mock authentication client for tests and the demo binary.
//!
//! Accounts live in memory. Passwords are held as `secrecy::Secret` so they
//! stay out of `Debug` output like everywhere else.
//!
//! # Example
//!
//! ```ignore
//! let auth = MockAuthClient::new()
//!     .with_account("ada@example.com", "correct-horse", Some("Ada".into()))?;
//!
//! let user = auth.login(&Credentials::new("ada@example.com", "correct-horse")).await?;
//! assert_eq!(user.display_name_or_email(), "Ada");
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::{
    AuthError, AuthenticatedUser, Credentials, Registration, UserId, ValidationError,
};
use crate::ports::AuthClient;

#[derive(Debug)]
struct Account {
    user: AuthenticatedUser,
    password: Secret<String>,
}

/// In-memory [`AuthClient`].
#[derive(Debug, Default)]
pub struct MockAuthClient {
    /// Accounts keyed by lowercased email.
    accounts: RwLock<HashMap<String, Account>>,
    current: RwLock<Option<AuthenticatedUser>>,
    /// Error returned by every call while set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockAuthClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account that can log in.
    pub fn with_account(
        mut self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<Self, ValidationError> {
        let user = AuthenticatedUser::new(
            UserId::new(format!("user-{}", Uuid::new_v4()))?,
            email,
            display_name,
        );
        self.accounts.get_mut().insert(
            normalize(email),
            Account {
                user,
                password: Secret::new(password.to_string()),
            },
        );
        Ok(self)
    }

    /// Starts with `user` already signed in.
    pub fn with_signed_in(mut self, user: AuthenticatedUser) -> Self {
        *self.current.get_mut() = Some(user);
        self
    }

    /// Forces every call to fail with `error`.
    pub fn with_error(mut self, error: AuthError) -> Self {
        *self.force_error.get_mut() = Some(error);
        self
    }

    pub async fn set_error(&self, error: AuthError) {
        *self.force_error.write().await = Some(error);
    }

    pub async fn clear_error(&self) {
        *self.force_error.write().await = None;
    }

    pub async fn sign_out(&self) {
        *self.current.write().await = None;
    }

    pub async fn account_count(&self) -> usize {
        self.accounts.read().await.len()
    }

    async fn check_forced_error(&self) -> Result<(), AuthError> {
        match self.force_error.read().await.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthClient for MockAuthClient {
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError> {
        self.check_forced_error().await?;
        Ok(self.current.read().await.clone())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedUser, AuthError> {
        self.check_forced_error().await?;

        let user = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(&normalize(&credentials.email))
                .ok_or(AuthError::InvalidCredentials)?;
            if account.password.expose_secret() != credentials.password() {
                return Err(AuthError::InvalidCredentials);
            }
            account.user.clone()
        };

        *self.current.write().await = Some(user.clone());
        Ok(user)
    }

    async fn register(&self, registration: &Registration) -> Result<AuthenticatedUser, AuthError> {
        self.check_forced_error().await?;
        registration.validate()?;

        let key = normalize(&registration.email);
        let user = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&key) {
                return Err(AuthError::EmailAlreadyRegistered(
                    registration.email.trim().to_string(),
                ));
            }
            let user = AuthenticatedUser::new(
                UserId::new(format!("user-{}", Uuid::new_v4()))?,
                registration.email.trim(),
                registration.display_name.clone(),
            );
            accounts.insert(
                key,
                Account {
                    user: user.clone(),
                    password: Secret::new(registration.password().to_string()),
                },
            );
            user
        };

        *self.current.write().await = Some(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MockAuthClient {
        MockAuthClient::new()
            .with_account("ada@example.com", "correct-horse", Some("Ada".into()))
            .unwrap()
    }

    #[tokio::test]
    async fn nobody_signed_in_initially() {
        assert_eq!(client().current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn login_with_valid_credentials_signs_in() {
        let auth = client();
        let user = auth
            .login(&Credentials::new("ADA@example.com", "correct-horse"))
            .await
            .unwrap();

        assert_eq!(user.display_name_or_email(), "Ada");
        assert_eq!(auth.current_user().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = client();
        let result = auth
            .login(&Credentials::new("ada@example.com", "wrong-horse"))
            .await;
        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert_eq!(auth.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn register_creates_account_and_signs_in() {
        let auth = client();
        let user = auth
            .register(&Registration::new("grace@example.com", "long-password", None))
            .await
            .unwrap();

        assert_eq!(user.email, "grace@example.com");
        assert_eq!(auth.account_count().await, 2);
        assert!(auth.current_user().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let result = client()
            .register(&Registration::new("ada@example.com", "long-password", None))
            .await;
        assert!(matches!(result, Err(AuthError::EmailAlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let result = client()
            .register(&Registration::new("grace@example.com", "short", None))
            .await;
        assert!(matches!(result, Err(AuthError::InvalidRegistration(_))));
    }

    #[tokio::test]
    async fn forced_error_applies_to_every_call() {
        let auth = client().with_error(AuthError::service_unavailable("maintenance"));
        assert!(auth.current_user().await.is_err());

        auth.clear_error().await;
        assert!(auth.current_user().await.is_ok());
    }
}
