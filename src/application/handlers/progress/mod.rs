//! Progress handlers: seeding a session from storage and handing it back.

mod resume_flow;
mod save_progress;

pub use resume_flow::{ResumeFlowHandler, ResumeFlowResult};
pub use save_progress::{SaveProgressError, SaveProgressHandler};
