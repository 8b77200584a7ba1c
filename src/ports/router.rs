//! Router port - navigation away from the flow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Identifier of a host route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    /// Creates a new RouteId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("route_id"));
        }
        Ok(Self(id))
    }

    /// The route users land on after leaving the flow by default.
    pub fn dashboard() -> Self {
        Self("dashboard".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host navigation. Synchronous: it only records the intent to navigate.
pub trait Router: Send + Sync {
    fn navigate_to(&self, route: &RouteId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_id_rejects_blank() {
        assert!(RouteId::new("  ").is_err());
        assert_eq!(RouteId::new("home").unwrap().as_str(), "home");
    }

    #[test]
    fn dashboard_route() {
        assert_eq!(RouteId::dashboard().to_string(), "dashboard");
    }
}
