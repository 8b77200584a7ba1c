//! Content module - Remote question content and readiness aggregation.
//!
//! A flow session needs eight independently-loading resources for its
//! question before a phase can render. Each resource is tracked by a small
//! state machine (`RemoteResourceState`), and a pure reducer folds the eight
//! states into one loading/error/ready signal.

mod aggregator;
mod model;
mod resource;

pub use aggregator::{
    reduce, AggregateStatus, DataAggregator, FetchPlan, FetchTicket, QuestionContent, Readiness,
    ResourceSettlement, SettlementOutcome,
};
pub use model::{
    Choice, ChoiceSet, ContentPayload, MainQuestion, Pattern, PatternData, QuestionMetadata,
};
pub use resource::{FetchError, RemoteResourceState, ResourceKind};
