//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the flow and the outside world. Adapters implement these ports.
//!
//! - `ContentSource` - remote question content (fetch + cache invalidation)
//! - `AuthClient` - authentication backend client
//! - `Router` - host navigation when the user leaves the flow
//! - `ProgressStore` - persistence of flow snapshots

mod auth_client;
mod content_source;
mod progress_store;
mod router;

pub use auth_client::AuthClient;
pub use content_source::ContentSource;
pub use progress_store::ProgressStore;
pub use router::{RouteId, Router};
