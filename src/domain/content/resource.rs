//! Remote resource kinds and per-resource load state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{Checkpoint, ErrorCode};

/// One of the eight remote resources a question needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "checkpoint", rename_all = "snake_case")]
pub enum ResourceKind {
    MainQuestion,
    Choices(Checkpoint),
    Metadata(Checkpoint),
    PatternData,
}

impl ResourceKind {
    /// All eight resources in canonical order.
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::MainQuestion,
        ResourceKind::Choices(Checkpoint::Q1),
        ResourceKind::Choices(Checkpoint::Q2),
        ResourceKind::Choices(Checkpoint::Q3),
        ResourceKind::Metadata(Checkpoint::Q1),
        ResourceKind::Metadata(Checkpoint::Q2),
        ResourceKind::Metadata(Checkpoint::Q3),
        ResourceKind::PatternData,
    ];

    /// Returns all resource kinds in canonical order.
    pub fn all() -> &'static [ResourceKind] {
        &Self::ALL
    }

    /// Blocking resources surface their errors; the rest only degrade the flow.
    pub fn is_blocking(&self) -> bool {
        matches!(self, ResourceKind::MainQuestion | ResourceKind::Choices(_))
    }

    /// The checkpoint this resource belongs to, if any.
    pub fn checkpoint(&self) -> Option<Checkpoint> {
        match self {
            ResourceKind::Choices(cp) | ResourceKind::Metadata(cp) => Some(*cp),
            ResourceKind::MainQuestion | ResourceKind::PatternData => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::MainQuestion => write!(f, "main question"),
            ResourceKind::Choices(cp) => write!(f, "{} choices", cp),
            ResourceKind::Metadata(cp) => write!(f, "{} metadata", cp),
            ResourceKind::PatternData => write!(f, "pattern data"),
        }
    }
}

/// Failure of a single remote fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("No {kind} for question {question_id}")]
    NotFound {
        kind: ResourceKind,
        question_id: String,
    },

    #[error("Content service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed {kind} payload: {reason}")]
    Malformed { kind: ResourceKind, reason: String },

    #[error("Content service returned a payload that is not {expected}")]
    UnexpectedPayload { expected: ResourceKind },
}

impl FetchError {
    /// Creates an unavailable error with a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        FetchError::Unavailable(message.into())
    }

    /// Returns the error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            FetchError::NotFound { .. } => ErrorCode::ContentNotFound,
            FetchError::Unavailable(_)
            | FetchError::Malformed { .. }
            | FetchError::UnexpectedPayload { .. } => ErrorCode::ContentUnavailable,
        }
    }
}

/// Load state of one remote resource.
///
/// # Invariants
///
/// - Data and an in-flight load never coexist: starting a load drops data.
/// - Data and an error never coexist after a fetch settles.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResourceState<T> {
    data: Option<T>,
    is_loading: bool,
    error: Option<FetchError>,
}

impl<T> RemoteResourceState<T> {
    /// Nothing requested yet.
    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }

    /// Marks the resource as in flight, discarding any previous outcome.
    pub fn begin(&mut self) {
        self.data = None;
        self.error = None;
        self.is_loading = true;
    }

    /// Settles the resource with data.
    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.error = None;
        self.is_loading = false;
    }

    /// Settles the resource with an error.
    pub fn fail(&mut self, error: FetchError) {
        self.data = None;
        self.error = Some(error);
        self.is_loading = false;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }
}

impl<T> Default for RemoteResourceState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
