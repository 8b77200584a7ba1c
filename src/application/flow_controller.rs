//! FlowController - root state machine of a questionnaire session.
//!
//! The controller owns the current [`Phase`], the user's responses and
//! checkpoint completion, the auth session, the two overlays and the content
//! aggregator. Every operation runs synchronously on the caller's thread;
//! I/O (content fetches, login) happens in the handlers, which feed results
//! back in.
//!
//! # Transitions
//!
//! All phase changes go through one validation point that classifies the
//! move as a [`TransitionKind`] and rejects anything the phase model does not
//! allow. Overlays never change the phase.
//!
//! # Auth gating
//!
//! `continue_flow` and `go_to_layer` are wrapped by [`AuthGate`]. Without a
//! session they park a [`PendingTransition`] behind the auth prompt and leave
//! the phase alone. `on_auth_modal_success` replays the parked transition
//! through the same code path an authenticated call takes.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::content::{
    AggregateStatus, DataAggregator, FetchPlan, QuestionContent, Readiness, ResourceSettlement,
    SettlementOutcome,
};
use crate::domain::flow::{
    continue_target, AuthGate, AuthSession, CheckpointCompletion, FlowError, FlowEvent,
    FlowProgress, FlowSnapshot, GateOutcome, GatedFlow, ModalOrchestrator, ModalVisibility,
    PendingTransition, Phase, PhaseSequence, RecordedEvent, ResponseKey, ResponseSet,
    ResponseValue, TransitionKind,
};
use crate::domain::foundation::{
    AuthError, AuthenticatedUser, Checkpoint, Percentage, QuestionId, Timestamp, ValidationError,
};
use crate::ports::{RouteId, Router};

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOptions {
    pub include_check_ins: bool,
    pub exit_route: RouteId,
}

impl FlowOptions {
    pub fn new(include_check_ins: bool, exit_route: RouteId) -> Self {
        Self {
            include_check_ins,
            exit_route,
        }
    }
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self::new(true, RouteId::dashboard())
    }
}

/// Persisted progress a session starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowSeed {
    pub responses: ResponseSet,
    pub completion: CheckpointCompletion,
}

impl From<FlowSnapshot> for FlowSeed {
    fn from(snapshot: FlowSnapshot) -> Self {
        Self {
            responses: snapshot.responses,
            completion: snapshot.completion,
        }
    }
}

/// What confirming the exit overlay did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The user was inside the flow and is back on Main.
    ReturnedToMain,
    /// The user was on Main and the router was sent away.
    LeftFlow(RouteId),
    /// The exit overlay was not open; nothing happened.
    NotRequested,
}

/// The questionnaire flow of one user.
pub struct FlowController {
    phase: Phase,
    sequence: PhaseSequence,
    responses: ResponseSet,
    completion: CheckpointCompletion,
    session: AuthSession,
    modals: ModalOrchestrator,
    content: DataAggregator,
    router: Arc<dyn Router>,
    exit_route: RouteId,
    last_error: Option<FlowError>,
    events: Vec<RecordedEvent>,
}

impl GatedFlow for FlowController {
    fn session(&self) -> &AuthSession {
        &self.session
    }

    fn modals_mut(&mut self) -> &mut ModalOrchestrator {
        &mut self.modals
    }
}

impl FlowController {
    /// Starts a session on Main with both overlays closed and no progress.
    pub fn new(session: AuthSession, router: Arc<dyn Router>, options: FlowOptions) -> Self {
        Self {
            phase: Phase::Main,
            sequence: PhaseSequence::new(options.include_check_ins),
            responses: ResponseSet::new(),
            completion: CheckpointCompletion::new(),
            session,
            modals: ModalOrchestrator::new(),
            content: DataAggregator::new(),
            router,
            exit_route: options.exit_route,
            last_error: None,
            events: Vec::new(),
        }
    }

    /// Seeds responses and completion from persisted progress.
    pub fn with_seed(mut self, seed: FlowSeed) -> Self {
        self.responses = seed.responses;
        self.completion = seed.completion;
        self
    }

    // ════════════════════════════════════════════════════════════════════
    // Renderer-facing state
    // ════════════════════════════════════════════════════════════════════

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn sequence(&self) -> PhaseSequence {
        self.sequence
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.session.user()
    }

    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    pub fn completion(&self) -> CheckpointCompletion {
        self.completion
    }

    /// Progress derived from the current responses and completion.
    pub fn progress(&self) -> FlowProgress {
        FlowProgress::new(&self.responses, self.completion)
    }

    pub fn progress_percentage(&self) -> Percentage {
        self.progress().percentage()
    }

    pub fn completed_checkpoints(&self) -> Vec<Checkpoint> {
        self.progress().completed_checkpoints()
    }

    pub fn modal_visibility(&self) -> ModalVisibility {
        self.modals.visibility()
    }

    pub fn modals(&self) -> &ModalOrchestrator {
        &self.modals
    }

    /// Inline message for the auth overlay.
    pub fn auth_error(&self) -> Option<&str> {
        self.modals.auth_error()
    }

    pub fn pending_transition(&self) -> Option<PendingTransition> {
        self.modals.pending()
    }

    pub fn question_id(&self) -> Option<&QuestionId> {
        self.content.question_id()
    }

    pub fn content(&self) -> &QuestionContent {
        self.content.content()
    }

    pub fn content_status(&self) -> AggregateStatus {
        self.content.status()
    }

    pub fn readiness(&self) -> Readiness {
        self.content.readiness()
    }

    pub fn is_ready(&self) -> bool {
        self.content.is_ready()
    }

    /// Error of the most recent failed operation, cleared by the next success.
    pub fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.events)
    }

    // ════════════════════════════════════════════════════════════════════
    // Resume / continue
    // ════════════════════════════════════════════════════════════════════

    /// Earliest selection phase whose checkpoint is incomplete, or Summary.
    pub fn get_resume_phase(&self) -> Phase {
        self.progress().resume_phase()
    }

    /// Moves to where the user should continue, if signed in.
    ///
    /// Complete → Summary, started → resume phase, otherwise the first
    /// selection. Without a session the auth prompt opens and the phase is
    /// unchanged. A blocking content error rejects the move.
    pub fn continue_flow(&mut self) -> Result<GateOutcome<Phase>, FlowError> {
        let outcome = self.gated(PendingTransition::ContinueFlow);
        self.track_error(outcome)
    }

    /// Jumps straight to the selection phase of layer `layer` (1-3).
    ///
    /// Bypasses the resume rule and leaves completion untouched.
    pub fn go_to_layer(&mut self, layer: u8) -> Result<GateOutcome<Phase>, FlowError> {
        let outcome = Checkpoint::from_layer(layer)
            .map_err(FlowError::from)
            .and_then(|cp| self.gated(PendingTransition::GoToLayer(cp)));
        self.track_error(outcome)
    }

    fn gated(&mut self, pending: PendingTransition) -> Result<GateOutcome<Phase>, FlowError> {
        match AuthGate::require_auth(self, pending, |flow| flow.run_pending(pending)) {
            GateOutcome::Allowed(result) => result.map(GateOutcome::Allowed),
            GateOutcome::Blocked => {
                self.record(FlowEvent::AuthRequired { pending });
                Ok(GateOutcome::Blocked)
            }
        }
    }

    /// The continuation shared by the direct and post-auth paths.
    fn run_pending(&mut self, pending: PendingTransition) -> Result<Phase, FlowError> {
        match pending {
            PendingTransition::ContinueFlow => {
                if let Some(error) = self.content.status().error {
                    warn!(phase = %self.phase, error = %error, "Continue blocked by content error");
                    return Err(FlowError::Content(error));
                }
                let target = continue_target(&self.progress());
                self.transition(target, TransitionKind::Resume)
            }
            PendingTransition::GoToLayer(cp) => {
                self.transition(Phase::selection(cp), TransitionKind::LayerShortcut)
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Auth overlay
    // ════════════════════════════════════════════════════════════════════

    /// Signs the user in and replays the parked continuation, if any.
    ///
    /// Returns the phase the replay landed on.
    pub fn on_auth_modal_success(
        &mut self,
        user: AuthenticatedUser,
    ) -> Result<Option<Phase>, FlowError> {
        self.on_auth_modal_success_with_seed(user, None)
    }

    /// Like [`on_auth_modal_success`](Self::on_auth_modal_success), but first
    /// folds the user's stored progress into this session so the replay
    /// never lands before it.
    pub fn on_auth_modal_success_with_seed(
        &mut self,
        user: AuthenticatedUser,
        stored: Option<FlowSeed>,
    ) -> Result<Option<Phase>, FlowError> {
        info!(user_id = %user.id, restored = stored.is_some(), "Signed in from auth prompt");
        self.session.sign_in(user);
        if let Some(seed) = stored {
            self.merge_seed(seed);
        }
        let replay = match self.modals.resolve_auth() {
            Some(pending) => self.run_pending(pending).map(Some),
            None => Ok(None),
        };
        self.track_error(replay)
    }

    /// Union of completion; stored responses fill keys not answered here.
    fn merge_seed(&mut self, seed: FlowSeed) {
        for cp in seed.completion.completed() {
            self.completion.mark(cp);
        }
        for (key, value) in seed.responses.iter() {
            if !self.responses.contains(key) {
                self.responses.save(key.clone(), value.clone());
            }
        }
        debug!(
            completed = self.completion.count(),
            responses = self.responses.len(),
            "Merged stored progress"
        );
    }

    /// Closes the auth overlay and drops the parked continuation.
    pub fn on_auth_modal_close(&mut self) -> Option<PendingTransition> {
        let dropped = self.modals.cancel_auth();
        if let Some(pending) = dropped {
            debug!(?pending, "Auth prompt dismissed, dropping continuation");
        }
        dropped
    }

    /// Shows a login/registration failure inside the auth overlay.
    pub fn on_auth_modal_error(&mut self, error: &AuthError) {
        warn!(error = %error, code = %error.code(), "Authentication attempt failed");
        self.modals.record_auth_error(error.user_message());
    }

    /// Ends the session. Progress stays in memory.
    pub fn sign_out(&mut self) -> Option<AuthenticatedUser> {
        self.session.sign_out()
    }

    // ════════════════════════════════════════════════════════════════════
    // Exit overlay
    // ════════════════════════════════════════════════════════════════════

    pub fn request_exit(&mut self) {
        self.modals.open_exit();
    }

    /// Confirms the exit overlay.
    ///
    /// Inside the flow this returns to Main; on Main it leaves the flow
    /// through the router.
    pub fn confirm_exit(&mut self) -> Result<ExitOutcome, FlowError> {
        if !self.modals.close_exit() {
            return Ok(ExitOutcome::NotRequested);
        }

        if self.phase != Phase::Main {
            let outcome = self
                .transition(Phase::Main, TransitionKind::Exit)
                .map(|_| ExitOutcome::ReturnedToMain);
            return self.track_error(outcome);
        }

        info!(route = %self.exit_route, "Leaving flow");
        self.router.navigate_to(&self.exit_route);
        self.record(FlowEvent::FlowExited {
            route: self.exit_route.to_string(),
        });
        Ok(ExitOutcome::LeftFlow(self.exit_route.clone()))
    }

    /// Closes the exit overlay; returns false if it was not open.
    pub fn cancel_exit(&mut self) -> bool {
        self.modals.close_exit()
    }

    // ════════════════════════════════════════════════════════════════════
    // Answering
    // ════════════════════════════════════════════════════════════════════

    /// Records the selection of the current layer and moves to its review.
    pub fn submit_selection(&mut self, value: ResponseValue) -> Result<Phase, FlowError> {
        let result = self.submit_selection_inner(value);
        self.track_error(result)
    }

    fn submit_selection_inner(&mut self, value: ResponseValue) -> Result<Phase, FlowError> {
        let cp = self.checkpoint_for("submit_selection", Phase::is_selection)?;
        if value.is_empty() {
            return Err(ValidationError::empty_selection(cp.id()).into());
        }
        self.store_response(ResponseKey::for_checkpoint(cp), value);
        self.transition(Phase::review(cp), TransitionKind::Advance)
    }

    /// Confirms the current layer's selection and moves on.
    pub fn confirm_review(&mut self) -> Result<Phase, FlowError> {
        let result = self.confirm_review_inner();
        self.track_error(result)
    }

    fn confirm_review_inner(&mut self) -> Result<Phase, FlowError> {
        let cp = self.checkpoint_for("confirm_review", Phase::is_review)?;
        if !self.responses.contains(&ResponseKey::for_checkpoint(cp)) {
            return Err(ValidationError::empty_selection(cp.id()).into());
        }
        self.mark_checkpoint_complete(cp);
        self.step(TransitionKind::Advance, "confirm_review")
    }

    /// Records an optional check-in answer and moves on.
    pub fn submit_check_in(&mut self, value: Option<ResponseValue>) -> Result<Phase, FlowError> {
        let result = self.submit_check_in_inner(value);
        self.track_error(result)
    }

    fn submit_check_in_inner(&mut self, value: Option<ResponseValue>) -> Result<Phase, FlowError> {
        let cp = self.checkpoint_for("submit_check_in", Phase::is_check_in)?;
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.store_response(ResponseKey::for_check_in(cp), value);
        }
        self.step(TransitionKind::Advance, "submit_check_in")
    }

    /// Records a response under `key`. Empty values are rejected.
    pub fn save_response(&mut self, key: ResponseKey, value: ResponseValue) -> Result<(), FlowError> {
        let result = if value.is_empty() {
            Err(ValidationError::empty_selection(key.as_str()).into())
        } else {
            self.store_response(key, value);
            Ok(())
        };
        self.track_error(result)
    }

    /// Marks a checkpoint complete; returns true if it was not before.
    pub fn mark_checkpoint_complete(&mut self, checkpoint: Checkpoint) -> bool {
        let newly = self.completion.mark(checkpoint);
        if newly {
            info!(
                %checkpoint,
                progress = %self.progress_percentage(),
                "Checkpoint completed"
            );
            self.record(FlowEvent::CheckpointCompleted { checkpoint });
        }
        newly
    }

    /// Forgets every response and completion and returns to Main.
    pub fn clear_responses(&mut self) -> Result<(), FlowError> {
        self.responses.clear();
        self.completion.reset();
        info!("Responses cleared");
        self.record(FlowEvent::ResponsesCleared);
        let result = self.transition(Phase::Main, TransitionKind::Reset).map(|_| ());
        self.track_error(result)
    }

    fn store_response(&mut self, key: ResponseKey, value: ResponseValue) {
        debug!(%key, "Saving response");
        self.responses.save(key.clone(), value);
        self.record(FlowEvent::ResponseSaved { key });
    }

    // ════════════════════════════════════════════════════════════════════
    // Stepping
    // ════════════════════════════════════════════════════════════════════

    /// Moves to the next phase of the sequence.
    ///
    /// Main is left through `continue_flow` or `go_to_layer` only. A selection
    /// needs a recorded response and a review needs its checkpoint confirmed.
    pub fn advance(&mut self) -> Result<Phase, FlowError> {
        let result = self.advance_inner();
        self.track_error(result)
    }

    fn advance_inner(&mut self) -> Result<Phase, FlowError> {
        if self.phase == Phase::Main {
            return Err(FlowError::wrong_phase("advance", self.phase));
        }
        if let Some(cp) = self.phase.checkpoint() {
            if self.phase.is_selection() && !self.responses.contains(&ResponseKey::for_checkpoint(cp)) {
                return Err(ValidationError::empty_selection(cp.id()).into());
            }
            if self.phase.is_review() && !self.completion.is_completed(cp) {
                return Err(ValidationError::invalid_format(
                    cp.id(),
                    "checkpoint has not been confirmed",
                )
                .into());
            }
        }
        self.step(TransitionKind::Advance, "advance")
    }

    /// Moves to the previous phase of the sequence.
    pub fn back(&mut self) -> Result<Phase, FlowError> {
        let result = self.step(TransitionKind::Back, "back");
        self.track_error(result)
    }

    fn step(&mut self, kind: TransitionKind, operation: &'static str) -> Result<Phase, FlowError> {
        let target = match kind {
            TransitionKind::Back => self.sequence.previous(self.phase),
            _ => self.sequence.next(self.phase),
        };
        let target = target.ok_or_else(|| FlowError::wrong_phase(operation, self.phase))?;
        self.transition(target, kind)
    }

    fn checkpoint_for(
        &self,
        operation: &'static str,
        accepts: fn(&Phase) -> bool,
    ) -> Result<Checkpoint, FlowError> {
        match self.phase.checkpoint() {
            Some(cp) if accepts(&self.phase) => Ok(cp),
            _ => Err(FlowError::wrong_phase(operation, self.phase)),
        }
    }

    /// The single place the phase changes.
    fn transition(&mut self, to: Phase, kind: TransitionKind) -> Result<Phase, FlowError> {
        let from = self.phase;
        if from == to {
            return Ok(to);
        }
        if !self.sequence.contains(to) || !kind.permits(&self.sequence, from, to) {
            return Err(FlowError::InvalidTransition { from, to, kind });
        }

        self.phase = to;
        info!(%from, %to, ?kind, "Phase changed");
        self.record(FlowEvent::PhaseChanged { from, to, kind });
        Ok(to)
    }

    // ════════════════════════════════════════════════════════════════════
    // Content
    // ════════════════════════════════════════════════════════════════════

    /// Starts tracking a question's content; `None` if already tracked.
    pub fn track_question(&mut self, question_id: QuestionId) -> Option<FetchPlan> {
        self.content.track(question_id)
    }

    /// Plans refetches of failed resources of the tracked question.
    pub fn retry_content(&mut self) -> Result<Option<FetchPlan>, FlowError> {
        let result = match self.content.question_id() {
            None => Err(FlowError::NoQuestionTracked),
            Some(_) => Ok(self.content.retry_failed()),
        };
        self.track_error(result)
    }

    /// Hands one fetch result to the aggregator.
    pub fn apply_settlement(&mut self, settlement: ResourceSettlement) -> SettlementOutcome {
        if let Err(error) = &settlement.outcome {
            if settlement.kind.is_blocking() {
                warn!(kind = %settlement.kind, error = %error, "Blocking content failed to load");
            }
        }
        self.content.apply(settlement)
    }

    // ════════════════════════════════════════════════════════════════════
    // Persistence
    // ════════════════════════════════════════════════════════════════════

    /// Progress in its persistable form.
    ///
    /// Requires a signed-in user and a tracked question.
    pub fn snapshot(&self) -> Result<FlowSnapshot, FlowError> {
        let user = self.session.user().ok_or(FlowError::Unauthenticated)?;
        let question_id = self
            .content
            .question_id()
            .ok_or(FlowError::NoQuestionTracked)?;
        Ok(FlowSnapshot {
            user_id: user.id.clone(),
            question_id: question_id.clone(),
            responses: self.responses.clone(),
            completion: self.completion,
            updated_at: Timestamp::now(),
        })
    }

    // ════════════════════════════════════════════════════════════════════
    // Bookkeeping
    // ════════════════════════════════════════════════════════════════════

    fn record(&mut self, event: FlowEvent) {
        self.events.push(RecordedEvent::now(event));
    }

    fn track_error<T>(&mut self, result: Result<T, FlowError>) -> Result<T, FlowError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(error) => {
                debug!(phase = %self.phase, code = %error.code(), error = %error, "Flow operation rejected");
                self.last_error = Some(error.clone());
            }
        }
        result
    }
}
