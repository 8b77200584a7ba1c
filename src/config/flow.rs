//! Flow behaviour configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// Whether the check-in interludes are part of the sequence
    #[serde(default = "default_include_check_ins")]
    pub include_check_ins: bool,

    /// Route the router is sent to when the user leaves from Main
    #[serde(default = "default_exit_route")]
    pub exit_route: String,

    /// Question the binary walks through
    #[serde(default = "default_question_id")]
    pub question_id: String,
}

impl FlowConfig {
    /// Validate flow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exit_route.trim().is_empty() {
            return Err(ValidationError::EmptyExitRoute);
        }
        if self.question_id.trim().is_empty() {
            return Err(ValidationError::EmptyQuestionId);
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            include_check_ins: default_include_check_ins(),
            exit_route: default_exit_route(),
            question_id: default_question_id(),
        }
    }
}

fn default_include_check_ins() -> bool {
    true
}

fn default_exit_route() -> String {
    "dashboard".to_string()
}

fn default_question_id() -> String {
    "city-car-ban".to_string()
}
