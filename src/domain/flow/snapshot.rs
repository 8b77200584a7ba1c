//! Persistable form of a user's progress.

use serde::{Deserialize, Serialize};

use super::{CheckpointCompletion, FlowProgress, ResponseSet};
use crate::domain::foundation::{QuestionId, Timestamp, UserId};

/// Responses and completion for one user and question, as handed back for
/// persistence and used to seed the next session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    pub user_id: UserId,
    pub question_id: QuestionId,
    #[serde(default)]
    pub responses: ResponseSet,
    #[serde(default)]
    pub completion: CheckpointCompletion,
    pub updated_at: Timestamp,
}

impl FlowSnapshot {
    /// A snapshot with no progress.
    pub fn empty(user_id: UserId, question_id: QuestionId) -> Self {
        Self {
            user_id,
            question_id,
            responses: ResponseSet::new(),
            completion: CheckpointCompletion::new(),
            updated_at: Timestamp::now(),
        }
    }

    pub fn progress(&self) -> FlowProgress {
        FlowProgress::new(&self.responses, self.completion)
    }
}
