//! LoadContentHandler - drives the fetches of a question's eight resources.
//!
//! Tracking a question in the controller yields a fetch plan. This handler
//! invalidates the source's cache for the new question, fires every fetch in
//! the plan concurrently and hands each result back to the controller as it
//! arrives. Results for a question the controller has since moved away from
//! are dropped by the controller, not here.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::application::FlowController;
use crate::domain::content::{FetchPlan, FetchTicket, Readiness, ResourceSettlement, SettlementOutcome};
use crate::domain::flow::FlowError;
use crate::domain::foundation::QuestionId;
use crate::ports::ContentSource;

/// Fetches issued for a plan and not yet settled.
pub struct PendingLoad {
    ticket: FetchTicket,
    in_flight: FuturesUnordered<BoxFuture<'static, ResourceSettlement>>,
}

impl PendingLoad {
    pub fn ticket(&self) -> &FetchTicket {
        &self.ticket
    }

    /// Number of fetches still in flight.
    pub fn remaining(&self) -> usize {
        self.in_flight.len()
    }

    /// The next fetch to settle, in completion order.
    pub async fn next_settlement(&mut self) -> Option<ResourceSettlement> {
        self.in_flight.next().await
    }
}

/// Outcome of driving a plan to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadContentResult {
    pub applied: usize,
    pub stale: usize,
    pub readiness: Readiness,
}

/// Handler for loading question content.
pub struct LoadContentHandler {
    source: Arc<dyn ContentSource>,
}

impl LoadContentHandler {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Issues every fetch of `plan`; invalidates the question first when the
    /// plan asks for it.
    pub async fn start(&self, plan: FetchPlan) -> PendingLoad {
        if plan.requires_invalidation() {
            self.source.invalidate(plan.question_id()).await;
        }
        let (ticket, kinds) = plan.into_parts();
        debug!(
            question_id = %ticket.question_id(),
            fetches = kinds.len(),
            "Issuing content fetches"
        );

        let in_flight = kinds
            .into_iter()
            .map(|kind| {
                let source = Arc::clone(&self.source);
                let ticket = ticket.clone();
                let fut: BoxFuture<'static, ResourceSettlement> = Box::pin(async move {
                    let outcome = source.fetch(kind, ticket.question_id()).await;
                    ResourceSettlement::new(ticket, kind, outcome)
                });
                fut
            })
            .collect();

        PendingLoad { ticket, in_flight }
    }

    /// Tracks `question_id` and loads its content to completion.
    ///
    /// Returns `None` when the question was already tracked.
    pub async fn handle(
        &self,
        controller: &mut FlowController,
        question_id: QuestionId,
    ) -> Option<LoadContentResult> {
        let plan = controller.track_question(question_id)?;
        let pending = self.start(plan).await;
        Some(Self::drain(controller, pending).await)
    }

    /// Refetches the resources that failed for the tracked question.
    pub async fn retry(
        &self,
        controller: &mut FlowController,
    ) -> Result<Option<LoadContentResult>, FlowError> {
        let plan = match controller.retry_content()? {
            Some(plan) => plan,
            None => return Ok(None),
        };
        let pending = self.start(plan).await;
        Ok(Some(Self::drain(controller, pending).await))
    }

    /// Like [`handle`](Self::handle) for a controller shared behind a mutex.
    ///
    /// The lock is held only while tracking and while applying each
    /// settlement, never across a fetch, so the user can switch questions
    /// while this load is still running.
    pub async fn handle_shared(
        &self,
        controller: Arc<Mutex<FlowController>>,
        question_id: QuestionId,
    ) -> Option<LoadContentResult> {
        let plan = controller.lock().await.track_question(question_id)?;
        let mut pending = self.start(plan).await;

        let mut result = (0, 0);
        while let Some(settlement) = pending.next_settlement().await {
            let outcome = controller.lock().await.apply_settlement(settlement);
            count(&mut result, outcome);
        }
        let readiness = controller.lock().await.readiness();
        Some(finish(pending.ticket(), result, readiness))
    }

    async fn drain(controller: &mut FlowController, mut pending: PendingLoad) -> LoadContentResult {
        let mut result = (0, 0);
        while let Some(settlement) = pending.next_settlement().await {
            count(&mut result, controller.apply_settlement(settlement));
        }
        finish(pending.ticket(), result, controller.readiness())
    }
}

fn count(result: &mut (usize, usize), outcome: SettlementOutcome) {
    match outcome {
        SettlementOutcome::Applied => result.0 += 1,
        SettlementOutcome::Stale => result.1 += 1,
    }
}

fn finish(ticket: &FetchTicket, (applied, stale): (usize, usize), readiness: Readiness) -> LoadContentResult {
    info!(
        question_id = %ticket.question_id(),
        applied,
        stale,
        ?readiness,
        "Content load finished"
    );
    LoadContentResult {
        applied,
        stale,
        readiness,
    }
}
