//! Auth client port - contract with the authentication backend.
//!
//! Only the client side lives here. Whatever issues sessions (hosted
//! identity provider, in-house service) sits behind an adapter.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Credentials, Registration};

/// Signs users in and reports the current session.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from `current_user` when nobody is signed in
/// - Return `AuthError::InvalidCredentials` for a rejected login
/// - Return `AuthError::EmailAlreadyRegistered` for a duplicate sign-up
/// - Return `AuthError::ServiceUnavailable` for transient failures
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// The user of the current session, if any.
    async fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError>;

    /// Signs in with email and password.
    async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedUser, AuthError>;

    /// Creates an account and signs it in.
    async fn register(&self, registration: &Registration) -> Result<AuthenticatedUser, AuthError>;
}
