//! Content handlers.

mod load_content;

pub use load_content::{LoadContentHandler, LoadContentResult, PendingLoad};
