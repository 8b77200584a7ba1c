//! Flow controller errors.

use thiserror::Error;

use super::{Phase, TransitionKind};
use crate::domain::content::FetchError;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors returned by flow operations.
///
/// None of these are fatal: the controller state is left exactly as it was
/// before the rejected operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Cannot move from {from} to {to} ({kind:?})")]
    InvalidTransition {
        from: Phase,
        to: Phase,
        kind: TransitionKind,
    },

    #[error("{operation} is not available in phase {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Question content failed to load: {0}")]
    Content(#[from] FetchError),

    #[error("An authenticated session is required")]
    Unauthenticated,

    #[error("No question is being tracked")]
    NoQuestionTracked,
}

impl FlowError {
    pub fn wrong_phase(operation: &'static str, phase: Phase) -> Self {
        FlowError::WrongPhase { operation, phase }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            FlowError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            FlowError::WrongPhase { .. } => ErrorCode::WrongPhase,
            FlowError::Validation(err) => ErrorCode::from(err),
            FlowError::Content(err) => err.code(),
            FlowError::Unauthenticated => ErrorCode::Unauthenticated,
            FlowError::NoQuestionTracked => ErrorCode::NoQuestionTracked,
        }
    }
}

impl From<FlowError> for DomainError {
    fn from(err: FlowError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
