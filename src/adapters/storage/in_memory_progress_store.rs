//! In-Memory Progress Store Adapter
//!
//! Keeps flow snapshots in memory. Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::flow::FlowSnapshot;
use crate::domain::foundation::{DomainError, ErrorCode, QuestionId, UserId};
use crate::ports::ProgressStore;

type SnapshotKey = (UserId, QuestionId);

/// In-memory storage for flow snapshots
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStore {
    snapshots: Arc<RwLock<HashMap<SnapshotKey, FlowSnapshot>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `save` and `clear` fail (useful for tests)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes `load` fail (useful for tests)
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Get the number of stored snapshots
    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.read().await.len()
    }

    fn check(flag: &AtomicBool) -> Result<(), DomainError> {
        if flag.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::StorageError,
                "Simulated progress store failure",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn load(
        &self,
        user_id: &UserId,
        question_id: &QuestionId,
    ) -> Result<Option<FlowSnapshot>, DomainError> {
        Self::check(&self.fail_reads)?;
        let snapshots = self.snapshots.read().await;
        Ok(snapshots
            .get(&(user_id.clone(), question_id.clone()))
            .cloned())
    }

    async fn save(&self, snapshot: &FlowSnapshot) -> Result<(), DomainError> {
        Self::check(&self.fail_writes)?;
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(
            (snapshot.user_id.clone(), snapshot.question_id.clone()),
            snapshot.clone(),
        );
        Ok(())
    }

    async fn clear(&self, user_id: &UserId, question_id: &QuestionId) -> Result<(), DomainError> {
        Self::check(&self.fail_writes)?;
        let mut snapshots = self.snapshots.write().await;
        snapshots.remove(&(user_id.clone(), question_id.clone()));
        Ok(())
    }
}
