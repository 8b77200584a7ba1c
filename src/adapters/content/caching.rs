//! Query cache in front of another content source.
//!
//! Successful fetches are kept per question until `invalidate` drops them.
//! Errors are never cached, so a retry always reaches the inner source.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::content::{ContentPayload, FetchError, ResourceKind};
use crate::domain::foundation::QuestionId;
use crate::ports::ContentSource;

/// Caches successful payloads of an inner [`ContentSource`].
pub struct CachingContentSource {
    inner: Arc<dyn ContentSource>,
    cache: RwLock<CacheState>,
}

/// Cached payloads plus an epoch per question that `invalidate` bumps.
///
/// A fetch only stores its result if the epoch it started under is still
/// current, so a response issued before an invalidation cannot refill it.
#[derive(Default)]
struct CacheState {
    entries: HashMap<QuestionId, HashMap<ResourceKind, ContentPayload>>,
    epochs: HashMap<QuestionId, u64>,
}

impl CacheState {
    fn epoch(&self, question_id: &QuestionId) -> u64 {
        self.epochs.get(question_id).copied().unwrap_or(0)
    }
}

impl CachingContentSource {
    pub fn new(inner: Arc<dyn ContentSource>) -> Self {
        Self {
            inner,
            cache: RwLock::new(CacheState::default()),
        }
    }

    /// Number of payloads cached for a question.
    pub async fn cached_count(&self, question_id: &QuestionId) -> usize {
        self.cache
            .read()
            .await
            .entries
            .get(question_id)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl ContentSource for CachingContentSource {
    async fn fetch(
        &self,
        kind: ResourceKind,
        question_id: &QuestionId,
    ) -> Result<ContentPayload, FetchError> {
        let (cached, epoch) = {
            let state = self.cache.read().await;
            let cached = state
                .entries
                .get(question_id)
                .and_then(|entries| entries.get(&kind))
                .cloned();
            (cached, state.epoch(question_id))
        };
        if let Some(payload) = cached {
            debug!(%question_id, %kind, "Content cache hit");
            return Ok(payload);
        }

        let payload = self.inner.fetch(kind, question_id).await?;

        let mut state = self.cache.write().await;
        if state.epoch(question_id) != epoch {
            debug!(%question_id, %kind, "Not caching payload fetched before invalidation");
            return Ok(payload);
        }
        state
            .entries
            .entry(question_id.clone())
            .or_default()
            .insert(kind, payload.clone());
        Ok(payload)
    }

    async fn invalidate(&self, question_id: &QuestionId) {
        {
            let mut state = self.cache.write().await;
            *state.epochs.entry(question_id.clone()).or_insert(0) += 1;
            if state.entries.remove(question_id).is_some() {
                debug!(%question_id, "Content cache invalidated");
            }
        }
        self.inner.invalidate(question_id).await;
    }
}
