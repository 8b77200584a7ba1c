//! Application handlers.
//!
//! Handlers coordinate the `FlowController` with the ports: content loading,
//! the auth overlay, and progress persistence.

pub mod auth;
pub mod content;
pub mod progress;

pub use auth::{AuthModalError, AuthModalOutcome, LoginHandler, RegisterHandler};
pub use content::{LoadContentHandler, LoadContentResult, PendingLoad};
pub use progress::{ResumeFlowHandler, ResumeFlowResult, SaveProgressError, SaveProgressHandler};
