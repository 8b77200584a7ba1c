//! Authentication types for the domain layer.
//!
//! These types represent the signed-in user and the requests made to the
//! authentication collaborator. They have **no provider dependencies**: any
//! backend can populate them through the `AuthClient` port.
//!
//! Passwords are wrapped in `secrecy::Secret` so they never show up in
//! `Debug` output or logs.

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use super::{DomainError, ErrorCode, UserId, ValidationError};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A user with an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address.
    pub email: String,

    /// Display name if the provider knows one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Login request submitted from the auth modal.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    password: Secret<String>,
}

impl Credentials {
    /// Creates login credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password.into()),
        }
    }

    /// Exposes the password (for handing to the auth provider).
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Sign-up request submitted from the auth modal.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    password: Secret<String>,
    pub display_name: Option<String>,
}

impl Registration {
    /// Creates a registration request.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password.into()),
            display_name,
        }
    }

    /// Exposes the password (for handing to the auth provider).
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Checks the fields locally before anything is sent to the provider.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        let len = self.password().chars().count();
        if len < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::invalid_format(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        Ok(())
    }
}

/// Errors returned by the authentication collaborator.
///
/// They are shown inline in the auth modal; flow state is otherwise unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Email/password combination was rejected.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration attempted with an email that already has an account.
    #[error("An account already exists for {0}")]
    EmailAlreadyRegistered(String),

    /// Registration fields failed validation.
    #[error("Invalid registration: {0}")]
    InvalidRegistration(#[from] ValidationError),

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }

    /// Returns the error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AuthError::EmailAlreadyRegistered(_) => ErrorCode::EmailAlreadyRegistered,
            AuthError::InvalidRegistration(invalid) => ErrorCode::from(invalid),
            AuthError::ServiceUnavailable(_) => ErrorCode::AuthUnavailable,
        }
    }

    /// Message suitable for inline display in the auth modal.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::ServiceUnavailable(_) => {
                "Sign-in is temporarily unavailable. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
