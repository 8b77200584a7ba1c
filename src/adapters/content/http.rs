//! HTTP content source - fetches question content from the content service.
//!
//! # Endpoints
//!
//! ```text
//! GET {base_url}/questions/{id}                      -> MainQuestion
//! GET {base_url}/questions/{id}/choices/{q1|q2|q3}   -> ChoiceSet
//! GET {base_url}/questions/{id}/metadata/{q1|q2|q3}  -> QuestionMetadata
//! GET {base_url}/questions/{id}/patterns             -> PatternData
//! ```
//!
//! The service answers with the bare resource as JSON. There is no client
//! side cache here; wrap it in `CachingContentSource` for that.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::content::{
    ChoiceSet, ContentPayload, FetchError, MainQuestion, PatternData, QuestionMetadata,
    ResourceKind,
};
use crate::domain::foundation::QuestionId;
use crate::ports::ContentSource;

/// Configuration for the HTTP content source.
#[derive(Debug, Clone)]
pub struct HttpContentConfig {
    /// Base URL of the content service, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpContentConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Content source backed by the remote content service.
pub struct HttpContentSource {
    config: HttpContentConfig,
    client: Client,
}

impl HttpContentSource {
    pub fn new(config: HttpContentConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::unavailable(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// URL of one resource.
    fn resource_url(&self, kind: ResourceKind, question_id: &QuestionId) -> String {
        let base = format!("{}/questions/{}", self.config.base_url, question_id);
        match kind {
            ResourceKind::MainQuestion => base,
            ResourceKind::Choices(cp) => format!("{}/choices/{}", base, cp.id()),
            ResourceKind::Metadata(cp) => format!("{}/metadata/{}", base, cp.id()),
            ResourceKind::PatternData => format!("{}/patterns", base),
        }
    }

    async fn check_status(
        response: Response,
        kind: ResourceKind,
        question_id: &QuestionId,
    ) -> Result<Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                kind,
                question_id: question_id.to_string(),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(FetchError::unavailable(format!(
            "Unexpected status {}: {}",
            status, body
        )))
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        kind: ResourceKind,
    ) -> Result<T, FetchError> {
        response.json::<T>().await.map_err(|e| FetchError::Malformed {
            kind,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(
        &self,
        kind: ResourceKind,
        question_id: &QuestionId,
    ) -> Result<ContentPayload, FetchError> {
        let url = self.resource_url(kind, question_id);
        debug!(%url, %kind, "Fetching question content");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "Content request failed");
            if e.is_timeout() {
                FetchError::unavailable(format!(
                    "Request timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            } else {
                FetchError::unavailable(e.to_string())
            }
        })?;
        let response = Self::check_status(response, kind, question_id).await?;

        let payload = match kind {
            ResourceKind::MainQuestion => {
                ContentPayload::MainQuestion(Self::decode::<MainQuestion>(response, kind).await?)
            }
            ResourceKind::Choices(_) => {
                ContentPayload::Choices(Self::decode::<ChoiceSet>(response, kind).await?)
            }
            ResourceKind::Metadata(_) => {
                ContentPayload::Metadata(Self::decode::<QuestionMetadata>(response, kind).await?)
            }
            ResourceKind::PatternData => {
                ContentPayload::Patterns(Self::decode::<PatternData>(response, kind).await?)
            }
        };
        Ok(payload)
    }

    async fn invalidate(&self, question_id: &QuestionId) {
        debug!(%question_id, "HTTP content source keeps no cache");
    }
}
