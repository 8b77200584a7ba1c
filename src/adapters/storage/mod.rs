//! Storage adapters.

mod in_memory_progress_store;

pub use in_memory_progress_store::InMemoryProgressStore;
