//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the questionnaire flow.

mod auth;
mod checkpoint;
mod errors;
mod ids;
mod percentage;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Credentials, Registration, MIN_PASSWORD_LENGTH};
pub use checkpoint::Checkpoint;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChoiceId, QuestionId, UserId};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
