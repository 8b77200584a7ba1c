//! Content service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where question content comes from
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentSourceKind {
    /// Seeded sample content, no network
    #[default]
    InMemory,
    /// Remote content service over HTTP
    Http,
}

/// Content service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub source: ContentSourceKind,

    /// Base URL of the content service (required for `http`)
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Keep fetched content until the question changes
    #[serde(default = "default_cache")]
    pub cache: bool,
}

impl ContentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate content configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.source == ContentSourceKind::Http {
            let url = self
                .base_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("content.base_url"))?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidContentUrl);
            }
        }
        Ok(())
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: ContentSourceKind::default(),
            base_url: None,
            timeout_secs: default_timeout(),
            cache: default_cache(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_cache() -> bool {
    true
}
