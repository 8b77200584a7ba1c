//! Progress store port - persistence of flow snapshots.

use async_trait::async_trait;

use crate::domain::flow::FlowSnapshot;
use crate::domain::foundation::{DomainError, QuestionId, UserId};

/// Loads and saves a user's progress on a question.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from `load` when nothing was saved yet
/// - Replace any previous snapshot for the same user and question on `save`
/// - Treat `clear` of a missing snapshot as success
/// - Report failures as `DomainError` with `ErrorCode::StorageError`
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn load(
        &self,
        user_id: &UserId,
        question_id: &QuestionId,
    ) -> Result<Option<FlowSnapshot>, DomainError>;

    async fn save(&self, snapshot: &FlowSnapshot) -> Result<(), DomainError>;

    async fn clear(&self, user_id: &UserId, question_id: &QuestionId) -> Result<(), DomainError>;
}
