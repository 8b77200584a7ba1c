//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `STANCE_FLOW` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use stance_flow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod content;
mod error;
mod flow;
mod logging;

pub use content::{ContentConfig, ContentSourceKind};
pub use error::{ConfigError, ValidationError};
pub use flow::FlowConfig;
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// in-memory setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Content service configuration
    #[serde(default)]
    pub content: ContentConfig,

    /// Flow behaviour
    #[serde(default)]
    pub flow: FlowConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STANCE_FLOW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STANCE_FLOW__CONTENT__SOURCE=http` -> `content.source = http`
    /// - `STANCE_FLOW__FLOW__INCLUDE_CHECK_INS=false` -> `flow.include_check_ins = false`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STANCE_FLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.content.validate()?;
        self.flow.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
