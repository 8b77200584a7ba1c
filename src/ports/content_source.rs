//! Content source port - the remote service that supplies question content.
//!
//! The flow asks for eight resources per question (see `ResourceKind`) and
//! treats each one as an opaque payload. Retry and backoff are the
//! implementation's business; a failed `fetch` is reported to the flow as-is.

use async_trait::async_trait;

use crate::domain::content::{ContentPayload, FetchError, ResourceKind};
use crate::domain::foundation::QuestionId;

/// Fetches question content.
///
/// # Contract
///
/// Implementations must:
/// - Return a payload whose shape matches `kind` (checked by the caller)
/// - Return `FetchError::NotFound` when the resource does not exist
/// - Return `FetchError::Unavailable` for transport failures
/// - Make `invalidate` idempotent: invalidating an unknown or already
///   invalidated question is not an error
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetches one resource of a question.
    async fn fetch(
        &self,
        kind: ResourceKind,
        question_id: &QuestionId,
    ) -> Result<ContentPayload, FetchError>;

    /// Drops anything cached for the question.
    async fn invalidate(&self, question_id: &QuestionId);
}
