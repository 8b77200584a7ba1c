//! SaveProgressHandler - hands the controller's progress back to storage.

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::application::FlowController;
use crate::domain::flow::{FlowError, FlowSnapshot};
use crate::domain::foundation::DomainError;
use crate::ports::ProgressStore;

/// Errors from saving or clearing progress.
#[derive(Debug, Error)]
pub enum SaveProgressError {
    /// No signed-in user or no tracked question.
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("Failed to persist progress: {0}")]
    Storage(#[from] DomainError),
}

/// Handler for persisting progress.
pub struct SaveProgressHandler {
    store: Arc<dyn ProgressStore>,
}

impl SaveProgressHandler {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Saves the controller's current snapshot.
    pub async fn handle(&self, controller: &FlowController) -> Result<FlowSnapshot, SaveProgressError> {
        let snapshot = controller.snapshot()?;
        self.store.save(&snapshot).await?;
        info!(
            user_id = %snapshot.user_id,
            question_id = %snapshot.question_id,
            completed = snapshot.completion.count(),
            "Progress saved"
        );
        Ok(snapshot)
    }

    /// Clears responses in the controller and in storage.
    pub async fn clear(&self, controller: &mut FlowController) -> Result<(), SaveProgressError> {
        let snapshot = controller.snapshot()?;
        self.store
            .clear(&snapshot.user_id, &snapshot.question_id)
            .await?;
        controller.clear_responses()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryProgressStore, RecordingRouter};
    use crate::application::FlowOptions;
    use crate::domain::flow::{AuthSession, Phase};
    use crate::domain::foundation::{AuthenticatedUser, Checkpoint, ErrorCode, QuestionId, UserId};

    fn signed_in_flow() -> FlowController {
        let user = AuthenticatedUser::new(UserId::new("user-1").unwrap(), "ada@example.com", None);
        let mut flow = FlowController::new(
            AuthSession::authenticated(user),
            Arc::new(RecordingRouter::new()),
            FlowOptions::default(),
        );
        flow.track_question(QuestionId::new("transit").unwrap());
        flow
    }

    #[tokio::test]
    async fn saves_snapshot_to_store() {
        let store = Arc::new(InMemoryProgressStore::new());
        let handler = SaveProgressHandler::new(store.clone());
        let mut flow = signed_in_flow();
        flow.mark_checkpoint_complete(Checkpoint::Q1);

        let snapshot = handler.handle(&flow).await.unwrap();

        assert!(snapshot.completion.is_completed(Checkpoint::Q1));
        assert_eq!(store.snapshot_count().await, 1);
    }

    #[tokio::test]
    async fn anonymous_session_cannot_save() {
        let handler = SaveProgressHandler::new(Arc::new(InMemoryProgressStore::new()));
        let flow = FlowController::new(
            AuthSession::anonymous(),
            Arc::new(RecordingRouter::new()),
            FlowOptions::default(),
        );

        let err = handler.handle(&flow).await.unwrap_err();
        assert!(matches!(err, SaveProgressError::Flow(FlowError::Unauthenticated)));
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let store = Arc::new(InMemoryProgressStore::new());
        store.set_fail_writes(true);
        let handler = SaveProgressHandler::new(store);

        let err = handler.handle(&signed_in_flow()).await.unwrap_err();
        assert!(matches!(err, SaveProgressError::Storage(ref e) if e.code == ErrorCode::StorageError));
    }

    #[tokio::test]
    async fn clear_resets_controller_and_store() {
        let store = Arc::new(InMemoryProgressStore::new());
        let handler = SaveProgressHandler::new(store.clone());
        let mut flow = signed_in_flow();
        flow.mark_checkpoint_complete(Checkpoint::Q1);
        flow.continue_flow().unwrap();
        handler.handle(&flow).await.unwrap();

        handler.clear(&mut flow).await.unwrap();

        assert_eq!(store.snapshot_count().await, 0);
        assert_eq!(flow.current_phase(), Phase::Main);
        assert!(flow.completed_checkpoints().is_empty());
    }
}
