//! Content source adapters.

mod caching;
mod http;
mod in_memory;

pub use caching::CachingContentSource;
pub use http::{HttpContentConfig, HttpContentSource};
pub use in_memory::InMemoryContentSource;
