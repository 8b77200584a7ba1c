//! In-memory content source for tests and the demo binary.
//!
//! Content is seeded up front. Failures and per-resource latency can be
//! injected to exercise error surfacing and out-of-order settlement.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::content::{
    Choice, ChoiceSet, ContentPayload, FetchError, MainQuestion, Pattern, PatternData,
    QuestionMetadata, ResourceKind,
};
use crate::domain::foundation::{Checkpoint, ChoiceId, QuestionId, ValidationError};
use crate::ports::ContentSource;

type ResourceKey = (QuestionId, ResourceKind);

/// Seeded, in-process content source.
#[derive(Debug, Default)]
pub struct InMemoryContentSource {
    payloads: RwLock<HashMap<ResourceKey, ContentPayload>>,
    failures: RwLock<HashMap<ResourceKey, FetchError>>,
    delays: RwLock<HashMap<ResourceKey, Duration>>,
    fetches: RwLock<Vec<ResourceKey>>,
    invalidations: RwLock<Vec<QuestionId>>,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a single payload for a question.
    pub fn with_payload(mut self, question_id: QuestionId, payload: ContentPayload) -> Self {
        self.payloads
            .get_mut()
            .insert((question_id, payload.kind()), payload);
        self
    }

    /// Seeds all eight resources of a question with generic content.
    pub fn with_sample_question(
        mut self,
        question_id: &str,
        title: &str,
    ) -> Result<Self, ValidationError> {
        let id = QuestionId::new(question_id)?;
        for payload in sample_payloads(&id, title)? {
            self.payloads
                .get_mut()
                .insert((id.clone(), payload.kind()), payload);
        }
        Ok(self)
    }

    /// Makes every fetch of `kind` for the question fail with `error`.
    pub async fn fail(&self, question_id: &QuestionId, kind: ResourceKind, error: FetchError) {
        self.failures
            .write()
            .await
            .insert((question_id.clone(), kind), error);
    }

    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    /// Delays every fetch of `kind` for the question.
    pub async fn delay(&self, question_id: &QuestionId, kind: ResourceKind, delay: Duration) {
        self.delays
            .write()
            .await
            .insert((question_id.clone(), kind), delay);
    }

    /// Number of fetches issued so far.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Fetches issued for one question.
    pub async fn fetches_for(&self, question_id: &QuestionId) -> Vec<ResourceKind> {
        self.fetches
            .read()
            .await
            .iter()
            .filter(|(id, _)| id == question_id)
            .map(|(_, kind)| *kind)
            .collect()
    }

    /// Questions invalidated so far, in order.
    pub async fn invalidations(&self) -> Vec<QuestionId> {
        self.invalidations.read().await.clone()
    }
}

#[async_trait]
impl ContentSource for InMemoryContentSource {
    async fn fetch(
        &self,
        kind: ResourceKind,
        question_id: &QuestionId,
    ) -> Result<ContentPayload, FetchError> {
        let key = (question_id.clone(), kind);
        self.fetches.write().await.push(key.clone());

        let delay = self.delays.read().await.get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failures.read().await.get(&key).cloned() {
            return Err(error);
        }

        self.payloads
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                kind,
                question_id: question_id.to_string(),
            })
    }

    async fn invalidate(&self, question_id: &QuestionId) {
        self.invalidations.write().await.push(question_id.clone());
    }
}

fn sample_payloads(id: &QuestionId, title: &str) -> Result<Vec<ContentPayload>, ValidationError> {
    let mut payloads = vec![ContentPayload::MainQuestion(MainQuestion {
        id: id.clone(),
        title: title.to_string(),
        description: None,
    })];

    for cp in Checkpoint::all() {
        let choices = [("agree", "Agree"), ("unsure", "Unsure"), ("disagree", "Disagree")]
            .iter()
            .map(|(choice_id, label)| {
                Ok(Choice {
                    id: ChoiceId::new(format!("{}-{}", cp.id(), choice_id))?,
                    label: label.to_string(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        payloads.push(ContentPayload::Choices(ChoiceSet {
            checkpoint: *cp,
            choices,
        }));
        payloads.push(ContentPayload::Metadata(QuestionMetadata {
            checkpoint: *cp,
            prompt: format!("{}: where do you stand?", cp.display_name()),
            allows_multiple: false,
        }));
    }

    payloads.push(ContentPayload::Patterns(PatternData {
        patterns: vec![Pattern {
            id: "steady".to_string(),
            label: "Held steady".to_string(),
            choice_ids: Vec::new(),
        }],
    }));
    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qid(id: &str) -> QuestionId {
        QuestionId::new(id).unwrap()
    }

    #[tokio::test]
    async fn sample_question_serves_all_eight_resources() {
        let source = InMemoryContentSource::new()
            .with_sample_question("transit", "Free public transit?")
            .unwrap();

        for kind in ResourceKind::all() {
            let payload = source.fetch(*kind, &qid("transit")).await.unwrap();
            assert!(payload.matches(*kind), "{} mismatched", kind);
        }
        assert_eq!(source.fetch_count().await, 8);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let source = InMemoryContentSource::new();
        let result = source.fetch(ResourceKind::MainQuestion, &qid("nope")).await;
        assert!(matches!(result, Err(FetchError::NotFound { .. })));
    }

    #[tokio::test]
    async fn injected_failure_wins_over_seeded_payload() {
        let source = InMemoryContentSource::new()
            .with_sample_question("transit", "Free public transit?")
            .unwrap();
        let kind = ResourceKind::Choices(Checkpoint::Q2);
        source
            .fail(&qid("transit"), kind, FetchError::unavailable("down"))
            .await;

        assert_eq!(
            source.fetch(kind, &qid("transit")).await,
            Err(FetchError::unavailable("down"))
        );

        source.clear_failures().await;
        assert!(source.fetch(kind, &qid("transit")).await.is_ok());
    }

    #[tokio::test]
    async fn invalidate_is_recorded_and_idempotent() {
        let source = InMemoryContentSource::new();
        source.invalidate(&qid("a")).await;
        source.invalidate(&qid("a")).await;
        assert_eq!(source.invalidations().await, vec![qid("a"), qid("a")]);
    }
}
