//! Domain layer containing flow logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `content` - Remote question content and the readiness aggregator
//! - `flow` - Phases, checkpoint progress, modal state and the auth gate

pub mod content;
pub mod flow;
pub mod foundation;
