//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the flow to external systems:
//! - `content` - question content sources (HTTP, caching, in-memory)
//! - `auth` - authentication clients
//! - `navigation` - host routers
//! - `storage` - progress persistence

pub mod auth;
pub mod content;
pub mod navigation;
pub mod storage;

pub use auth::MockAuthClient;
pub use content::{CachingContentSource, HttpContentConfig, HttpContentSource, InMemoryContentSource};
pub use navigation::{LoggingRouter, RecordingRouter};
pub use storage::InMemoryProgressStore;
