//! DataAggregator - joins the eight remote resources of a question into one
//! readiness signal.
//!
//! The aggregator itself never performs I/O. Tracking a question produces a
//! [`FetchPlan`]; whoever drives the plan (see `LoadContentHandler`) hands each
//! result back as a [`ResourceSettlement`] in whatever order it arrives.
//!
//! # Staleness
//!
//! Every plan carries a [`FetchTicket`] made of the question id and a
//! generation counter. Switching questions issues a new ticket; settlements
//! carrying any other ticket are dropped, so a late answer for an old question
//! can never populate (or mark ready) the current one. The generation makes
//! this hold even when the user switches A → B → A while A's first fetches are
//! still in flight.

use tracing::debug;

use super::{
    ChoiceSet, ContentPayload, FetchError, MainQuestion, PatternData, QuestionMetadata,
    RemoteResourceState, ResourceKind,
};
use crate::domain::foundation::{Checkpoint, QuestionId};

/// Identity tag attached to every fetch issued for a tracked question.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    question_id: QuestionId,
    generation: u64,
}

impl FetchTicket {
    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Fetches that need to be issued for a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    ticket: FetchTicket,
    kinds: Vec<ResourceKind>,
    invalidate: bool,
}

impl FetchPlan {
    pub fn ticket(&self) -> &FetchTicket {
        &self.ticket
    }

    pub fn question_id(&self) -> &QuestionId {
        &self.ticket.question_id
    }

    pub fn kinds(&self) -> &[ResourceKind] {
        &self.kinds
    }

    /// True when the collaborator's cache for the question must be dropped
    /// before fetching (question switch), false for a plain retry.
    pub fn requires_invalidation(&self) -> bool {
        self.invalidate
    }

    /// Splits the plan into its ticket and resource list.
    pub fn into_parts(self) -> (FetchTicket, Vec<ResourceKind>) {
        (self.ticket, self.kinds)
    }
}

/// The outcome of one fetch, tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSettlement {
    pub ticket: FetchTicket,
    pub kind: ResourceKind,
    pub outcome: Result<ContentPayload, FetchError>,
}

impl ResourceSettlement {
    pub fn new(
        ticket: FetchTicket,
        kind: ResourceKind,
        outcome: Result<ContentPayload, FetchError>,
    ) -> Self {
        Self {
            ticket,
            kind,
            outcome,
        }
    }
}

/// What happened to a settlement handed to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Applied,
    Stale,
}

/// Combined loading/error/ready view of the eight resources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateStatus {
    /// True while any resource is in flight.
    pub is_loading: bool,
    /// First error among main question and the three choice sets.
    pub error: Option<FetchError>,
    /// True only when all eight resources hold data.
    pub is_ready: bool,
}

/// Settled summary of [`AggregateStatus`] for renderers.
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    /// No question tracked yet.
    Idle,
    Loading,
    Ready,
    /// A blocking resource failed.
    Failed(FetchError),
    /// Everything settled, blocking data is present, but some non-blocking
    /// resource failed. Renderers can proceed with reduced functionality.
    Degraded { missing: Vec<ResourceKind> },
}

/// Per-resource state for one question.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuestionContent {
    main: RemoteResourceState<MainQuestion>,
    choices: [RemoteResourceState<ChoiceSet>; 3],
    metadata: [RemoteResourceState<QuestionMetadata>; 3],
    patterns: RemoteResourceState<PatternData>,
}

/// Borrowed view of one resource's state, independent of its payload type.
#[derive(Debug, Clone, Copy)]
struct SlotView<'a> {
    has_data: bool,
    is_loading: bool,
    error: Option<&'a FetchError>,
}

impl<'a, T> From<&'a RemoteResourceState<T>> for SlotView<'a> {
    fn from(state: &'a RemoteResourceState<T>) -> Self {
        Self {
            has_data: state.has_data(),
            is_loading: state.is_loading(),
            error: state.error(),
        }
    }
}

impl QuestionContent {
    pub fn main_question(&self) -> &RemoteResourceState<MainQuestion> {
        &self.main
    }

    pub fn choices(&self, checkpoint: Checkpoint) -> &RemoteResourceState<ChoiceSet> {
        &self.choices[checkpoint.index()]
    }

    pub fn metadata(&self, checkpoint: Checkpoint) -> &RemoteResourceState<QuestionMetadata> {
        &self.metadata[checkpoint.index()]
    }

    pub fn patterns(&self) -> &RemoteResourceState<PatternData> {
        &self.patterns
    }

    fn view(&self, kind: ResourceKind) -> SlotView<'_> {
        match kind {
            ResourceKind::MainQuestion => (&self.main).into(),
            ResourceKind::Choices(cp) => (&self.choices[cp.index()]).into(),
            ResourceKind::Metadata(cp) => (&self.metadata[cp.index()]).into(),
            ResourceKind::PatternData => (&self.patterns).into(),
        }
    }

    fn begin(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::MainQuestion => self.main.begin(),
            ResourceKind::Choices(cp) => self.choices[cp.index()].begin(),
            ResourceKind::Metadata(cp) => self.metadata[cp.index()].begin(),
            ResourceKind::PatternData => self.patterns.begin(),
        }
    }

    fn fail(&mut self, kind: ResourceKind, error: FetchError) {
        match kind {
            ResourceKind::MainQuestion => self.main.fail(error),
            ResourceKind::Choices(cp) => self.choices[cp.index()].fail(error),
            ResourceKind::Metadata(cp) => self.metadata[cp.index()].fail(error),
            ResourceKind::PatternData => self.patterns.fail(error),
        }
    }

    fn settle(&mut self, kind: ResourceKind, outcome: Result<ContentPayload, FetchError>) {
        let payload = match outcome {
            Ok(payload) => payload,
            Err(error) => return self.fail(kind, error),
        };
        if !payload.matches(kind) {
            return self.fail(kind, FetchError::UnexpectedPayload { expected: kind });
        }
        match payload {
            ContentPayload::MainQuestion(q) => self.main.succeed(q),
            ContentPayload::Choices(set) => {
                let idx = set.checkpoint.index();
                self.choices[idx].succeed(set);
            }
            ContentPayload::Metadata(meta) => {
                let idx = meta.checkpoint.index();
                self.metadata[idx].succeed(meta);
            }
            ContentPayload::Patterns(p) => self.patterns.succeed(p),
        }
    }
}

/// Folds the eight resource states into one status.
///
/// Pure: the result depends only on `content`.
pub fn reduce(content: &QuestionContent) -> AggregateStatus {
    let views: Vec<(ResourceKind, SlotView<'_>)> = ResourceKind::all()
        .iter()
        .map(|kind| (*kind, content.view(*kind)))
        .collect();

    let is_loading = views.iter().any(|(_, v)| v.is_loading);
    let is_ready = views.iter().all(|(_, v)| v.has_data);
    let error = views
        .iter()
        .filter(|(kind, _)| kind.is_blocking())
        .find_map(|(_, v)| v.error.cloned());

    AggregateStatus {
        is_loading,
        error,
        is_ready,
    }
}

/// Tracks the content of the current question.
#[derive(Debug, Clone, Default)]
pub struct DataAggregator {
    ticket: Option<FetchTicket>,
    next_generation: u64,
    content: QuestionContent,
}

impl DataAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The question currently tracked, if any.
    pub fn question_id(&self) -> Option<&QuestionId> {
        self.ticket.as_ref().map(|t| &t.question_id)
    }

    /// The ticket current settlements must carry.
    pub fn ticket(&self) -> Option<&FetchTicket> {
        self.ticket.as_ref()
    }

    pub fn content(&self) -> &QuestionContent {
        &self.content
    }

    /// Starts tracking `question_id`.
    ///
    /// Returns `None` when that question is already tracked: its fetches were
    /// already issued and are reused. Otherwise every resource is reset to
    /// loading under a fresh ticket and a plan covering all eight resources
    /// is returned.
    pub fn track(&mut self, question_id: QuestionId) -> Option<FetchPlan> {
        if self.question_id() == Some(&question_id) {
            return None;
        }

        let ticket = FetchTicket {
            question_id,
            generation: self.next_generation,
        };
        self.next_generation += 1;

        self.content = QuestionContent::default();
        for kind in ResourceKind::all() {
            self.content.begin(*kind);
        }
        debug!(
            question_id = %ticket.question_id,
            generation = ticket.generation,
            "Tracking question content"
        );
        self.ticket = Some(ticket.clone());

        Some(FetchPlan {
            ticket,
            kinds: ResourceKind::ALL.to_vec(),
            invalidate: true,
        })
    }

    /// Re-issues fetches for resources that settled with an error.
    ///
    /// Returns `None` when nothing is tracked or nothing failed.
    pub fn retry_failed(&mut self) -> Option<FetchPlan> {
        let ticket = self.ticket.clone()?;
        let failed: Vec<ResourceKind> = ResourceKind::all()
            .iter()
            .copied()
            .filter(|kind| self.content.view(*kind).error.is_some())
            .collect();
        if failed.is_empty() {
            return None;
        }
        for kind in &failed {
            self.content.begin(*kind);
        }
        Some(FetchPlan {
            ticket,
            kinds: failed,
            invalidate: false,
        })
    }

    /// Applies a settlement if it belongs to the current ticket.
    pub fn apply(&mut self, settlement: ResourceSettlement) -> SettlementOutcome {
        if self.ticket.as_ref() != Some(&settlement.ticket) {
            debug!(
                question_id = %settlement.ticket.question_id,
                generation = settlement.ticket.generation,
                kind = %settlement.kind,
                "Dropping stale content settlement"
            );
            return SettlementOutcome::Stale;
        }
        if !self.content.view(settlement.kind).is_loading {
            debug!(kind = %settlement.kind, "Dropping duplicate content settlement");
            return SettlementOutcome::Stale;
        }

        debug!(
            kind = %settlement.kind,
            ok = settlement.outcome.is_ok(),
            "Content resource settled"
        );
        self.content.settle(settlement.kind, settlement.outcome);
        SettlementOutcome::Applied
    }

    /// Current combined status.
    pub fn status(&self) -> AggregateStatus {
        reduce(&self.content)
    }

    pub fn is_ready(&self) -> bool {
        self.status().is_ready
    }

    /// Settled summary for renderers.
    pub fn readiness(&self) -> Readiness {
        if self.ticket.is_none() {
            return Readiness::Idle;
        }
        let status = self.status();
        if let Some(error) = status.error {
            return Readiness::Failed(error);
        }
        if status.is_ready {
            return Readiness::Ready;
        }
        if status.is_loading {
            return Readiness::Loading;
        }
        let missing = ResourceKind::all()
            .iter()
            .copied()
            .filter(|kind| !self.content.view(*kind).has_data)
            .collect();
        Readiness::Degraded { missing }
    }
}
