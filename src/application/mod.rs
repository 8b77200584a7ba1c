//! Application layer - the flow controller and the handlers around it.
//!
//! The controller owns all session state and is synchronous. Handlers do the
//! async work against ports and feed results back into the controller.

mod flow_controller;
pub mod handlers;

pub use flow_controller::{ExitOutcome, FlowController, FlowOptions, FlowSeed};
pub use handlers::{
    AuthModalError, AuthModalOutcome, LoadContentHandler, LoadContentResult, LoginHandler,
    PendingLoad, RegisterHandler, ResumeFlowHandler, ResumeFlowResult, SaveProgressError,
    SaveProgressHandler,
};
