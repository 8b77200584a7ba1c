//! Integration tests for a full questionnaire session.
//!
//! These tests drive the controller through the handlers the way a host
//! would: start a session, load content, pass the auth gate, answer the
//! three layers, save and leave. All collaborators are in-memory.

use std::sync::Arc;

use stance_flow::adapters::{
    InMemoryContentSource, InMemoryProgressStore, MockAuthClient, RecordingRouter,
};
use stance_flow::application::{
    AuthModalError, ExitOutcome, FlowOptions, LoadContentHandler, LoginHandler, RegisterHandler,
    ResumeFlowHandler, SaveProgressHandler,
};
use stance_flow::domain::content::{FetchError, Readiness, ResourceKind};
use stance_flow::domain::flow::{
    FlowError, FlowEvent, GateOutcome, PendingTransition, Phase, ResponseValue,
};
use stance_flow::domain::foundation::{
    AuthError, Checkpoint, Credentials, QuestionId, Registration,
};
use stance_flow::ports::{RouteId, Router};

// =============================================================================
// Test Infrastructure
// =============================================================================

const EMAIL: &str = "ada@example.com";
const PASSWORD: &str = "analytical engine";

fn question() -> QuestionId {
    QuestionId::new("city-car-ban").unwrap()
}

fn content() -> Arc<InMemoryContentSource> {
    Arc::new(
        InMemoryContentSource::new()
            .with_sample_question("city-car-ban", "Should cars be banned from city centres?")
            .unwrap(),
    )
}

fn auth() -> Arc<MockAuthClient> {
    Arc::new(
        MockAuthClient::new()
            .with_account(EMAIL, PASSWORD, Some("Ada".to_string()))
            .unwrap(),
    )
}

struct Harness {
    auth: Arc<MockAuthClient>,
    content: Arc<InMemoryContentSource>,
    store: Arc<InMemoryProgressStore>,
    router: Arc<RecordingRouter>,
}

impl Harness {
    fn new() -> Self {
        Self {
            auth: auth(),
            content: content(),
            store: Arc::new(InMemoryProgressStore::new()),
            router: Arc::new(RecordingRouter::new()),
        }
    }

    fn resume_handler(&self, options: FlowOptions) -> ResumeFlowHandler {
        let router: Arc<dyn Router> = self.router.clone();
        ResumeFlowHandler::new(self.auth.clone(), self.store.clone(), router, options)
    }

    fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.auth.clone(), self.store.clone())
    }

    fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(self.auth.clone(), self.store.clone())
    }

    async fn start(&self, options: FlowOptions) -> stance_flow::application::FlowController {
        let mut flow = self
            .resume_handler(options)
            .handle(&question())
            .await
            .unwrap()
            .controller;
        LoadContentHandler::new(self.content.clone())
            .handle(&mut flow, question())
            .await
            .unwrap();
        flow
    }
}

fn pick(checkpoint: Checkpoint) -> ResponseValue {
    ResponseValue::single(format!("{}-agree", checkpoint.id())).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn anonymous_continue_is_parked_until_login() {
    let h = Harness::new();
    let mut flow = h.start(FlowOptions::default()).await;
    assert!(flow.is_ready());

    let outcome = flow.continue_flow().unwrap();
    assert_eq!(outcome, GateOutcome::Blocked);
    assert_eq!(flow.current_phase(), Phase::Main);
    assert!(flow.modal_visibility().auth);
    assert_eq!(flow.pending_transition(), Some(PendingTransition::ContinueFlow));

    let outcome = h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();

    assert_eq!(outcome.resumed_at, Some(Phase::Q1Selection));
    assert_eq!(flow.current_phase(), Phase::Q1Selection);
    assert!(!flow.modal_visibility().auth);
    assert!(flow.pending_transition().is_none());
}

#[tokio::test]
async fn failed_login_keeps_overlay_and_continuation() {
    let h = Harness::new();
    let mut flow = h.start(FlowOptions::default()).await;
    flow.continue_flow().unwrap();

    let err = h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err, AuthModalError::Auth(AuthError::InvalidCredentials));
    assert!(flow.modal_visibility().auth);
    assert!(flow.auth_error().is_some());
    assert_eq!(flow.pending_transition(), Some(PendingTransition::ContinueFlow));
    assert_eq!(flow.current_phase(), Phase::Main);
}

#[tokio::test]
async fn dismissing_overlay_drops_continuation() {
    let h = Harness::new();
    let mut flow = h.start(FlowOptions::default()).await;
    flow.go_to_layer(2).unwrap();

    let dropped = flow.on_auth_modal_close();

    assert_eq!(dropped, Some(PendingTransition::GoToLayer(Checkpoint::Q2)));
    assert!(!flow.modal_visibility().auth);

    // Signing in later does not replay anything.
    let outcome = h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();
    assert_eq!(outcome.resumed_at, None);
    assert_eq!(flow.current_phase(), Phase::Main);
}

#[tokio::test]
async fn registration_resumes_layer_shortcut() {
    let h = Harness::new();
    let mut flow = h.start(FlowOptions::default()).await;
    assert_eq!(flow.go_to_layer(3).unwrap(), GateOutcome::Blocked);

    let outcome = h.register_handler()
        .handle(
            &mut flow,
            Registration::new("grace@example.com", "compiler pioneer", Some("Grace".into())),
        )
        .await
        .unwrap();

    assert_eq!(outcome.resumed_at, Some(Phase::Q3Selection));
    assert_eq!(h.auth.account_count().await, 2);
}

#[tokio::test]
async fn full_walk_with_check_ins_reaches_summary() {
    let h = Harness::new();
    let mut flow = h.start(FlowOptions::default()).await;
    flow.continue_flow().unwrap();
    h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();

    let mut visited = vec![flow.current_phase()];
    for cp in Checkpoint::all() {
        visited.push(flow.submit_selection(pick(*cp)).unwrap());
        visited.push(flow.confirm_review().unwrap());
        if flow.current_phase().is_check_in() {
            visited.push(flow.submit_check_in(None).unwrap());
        }
    }

    assert_eq!(
        visited,
        vec![
            Phase::Q1Selection,
            Phase::Q1Review,
            Phase::CheckIn1,
            Phase::Q2Selection,
            Phase::Q2Review,
            Phase::CheckIn2,
            Phase::Q3Selection,
            Phase::Q3Review,
            Phase::CheckIn3,
            Phase::Summary,
        ]
    );
    assert_eq!(flow.progress_percentage().value(), 100);
    assert!(flow.progress().is_complete());
}

#[tokio::test]
async fn walk_without_check_ins_skips_interludes() {
    let h = Harness::new();
    let options = FlowOptions::new(false, RouteId::dashboard());
    let mut flow = h.start(options).await;
    flow.continue_flow().unwrap();
    h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();

    flow.submit_selection(pick(Checkpoint::Q1)).unwrap();
    assert_eq!(flow.confirm_review().unwrap(), Phase::Q2Selection);
    flow.submit_selection(pick(Checkpoint::Q2)).unwrap();
    flow.confirm_review().unwrap();
    flow.submit_selection(pick(Checkpoint::Q3)).unwrap();
    assert_eq!(flow.confirm_review().unwrap(), Phase::Summary);
}

#[tokio::test]
async fn saved_progress_resumes_in_next_session() {
    let h = Harness::new();
    let mut flow = h.start(FlowOptions::default()).await;
    flow.continue_flow().unwrap();
    h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();
    flow.submit_selection(pick(Checkpoint::Q1)).unwrap();
    flow.confirm_review().unwrap();
    SaveProgressHandler::new(h.store.clone())
        .handle(&flow)
        .await
        .unwrap();

    // The mock keeps the user signed in, as a host session would.
    let result = h
        .resume_handler(FlowOptions::default())
        .handle(&question())
        .await
        .unwrap();
    let mut next = result.controller;

    assert!(result.restored);
    assert_eq!(next.current_phase(), Phase::Main);
    assert_eq!(next.completed_checkpoints(), vec![Checkpoint::Q1]);
    assert_eq!(next.get_resume_phase(), Phase::Q2Selection);
    assert_eq!(
        next.continue_flow().unwrap(),
        GateOutcome::Allowed(Phase::Q2Selection)
    );
}

#[tokio::test]
async fn anonymous_return_resumes_stored_progress_after_login() {
    let h = Harness::new();
    let mut first = h.start(FlowOptions::default()).await;
    first.continue_flow().unwrap();
    h.login_handler()
        .handle(&mut first, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();
    first.submit_selection(pick(Checkpoint::Q1)).unwrap();
    first.confirm_review().unwrap();
    SaveProgressHandler::new(h.store.clone())
        .handle(&first)
        .await
        .unwrap();

    // Come back signed out: the session starts empty.
    h.auth.sign_out().await;
    let mut flow = h.start(FlowOptions::default()).await;
    assert!(!flow.progress().has_started());
    assert_eq!(flow.continue_flow().unwrap(), GateOutcome::Blocked);

    let outcome = h
        .login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();

    assert_eq!(outcome.resumed_at, Some(Phase::Q2Selection));
    assert_eq!(flow.completed_checkpoints(), vec![Checkpoint::Q1]);
    assert_eq!(flow.responses().selection(Checkpoint::Q1), Some(&pick(Checkpoint::Q1)));

    // Saving again keeps the restored progress.
    let saved = SaveProgressHandler::new(h.store.clone())
        .handle(&flow)
        .await
        .unwrap();
    assert_eq!(saved.completion.completed(), vec![Checkpoint::Q1]);
}

#[tokio::test]
async fn blocking_content_error_stops_continue() {
    let h = Harness::new();
    h.content
        .fail(
            &question(),
            ResourceKind::Choices(Checkpoint::Q2),
            FetchError::unavailable("timeout"),
        )
        .await;
    let mut flow = h.start(FlowOptions::default()).await;
    assert!(matches!(flow.readiness(), Readiness::Failed(_)));

    flow.continue_flow().unwrap();
    let err = h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthModalError::Flow(FlowError::Content(_))));
    assert!(flow.session().is_authenticated());
    assert_eq!(flow.current_phase(), Phase::Main);
    assert!(flow.last_error().is_some());

    // Retrying after the outage clears the error and unblocks continue.
    h.content.clear_failures().await;
    LoadContentHandler::new(h.content.clone())
        .retry(&mut flow)
        .await
        .unwrap();
    assert!(flow.is_ready());
    assert_eq!(
        flow.continue_flow().unwrap(),
        GateOutcome::Allowed(Phase::Q1Selection)
    );
}

#[tokio::test]
async fn non_blocking_failure_degrades_but_allows_continue() {
    let h = Harness::new();
    h.content
        .fail(&question(), ResourceKind::PatternData, FetchError::unavailable("down"))
        .await;
    let mut flow = h.start(FlowOptions::default()).await;

    assert_eq!(
        flow.readiness(),
        Readiness::Degraded {
            missing: vec![ResourceKind::PatternData]
        }
    );
    flow.continue_flow().unwrap();
    let outcome = h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();
    assert_eq!(outcome.resumed_at, Some(Phase::Q1Selection));
}

#[tokio::test]
async fn exit_returns_to_main_then_leaves_flow() {
    let h = Harness::new();
    let route = RouteId::new("home").unwrap();
    let mut flow = h.start(FlowOptions::new(true, route.clone())).await;
    flow.continue_flow().unwrap();
    h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();

    flow.request_exit();
    assert!(flow.modal_visibility().exit);
    assert_eq!(flow.confirm_exit().unwrap(), ExitOutcome::ReturnedToMain);
    assert_eq!(flow.current_phase(), Phase::Main);
    assert!(h.router.visited().is_empty());

    flow.request_exit();
    assert_eq!(flow.confirm_exit().unwrap(), ExitOutcome::LeftFlow(route.clone()));
    assert_eq!(h.router.last(), Some(route));

    let events: Vec<&'static str> = flow.take_events().iter().map(|r| r.event.name()).collect();
    assert!(events.contains(&"flow.exited"));
}

#[tokio::test]
async fn events_record_session_history() {
    let h = Harness::new();
    let mut flow = h.start(FlowOptions::default()).await;
    flow.continue_flow().unwrap();
    h.login_handler()
        .handle(&mut flow, Credentials::new(EMAIL, PASSWORD))
        .await
        .unwrap();
    flow.submit_selection(pick(Checkpoint::Q1)).unwrap();
    flow.confirm_review().unwrap();

    let events: Vec<FlowEvent> = flow.take_events().into_iter().map(|r| r.event).collect();

    assert!(matches!(events[0], FlowEvent::AuthRequired { .. }));
    assert!(events
        .iter()
        .any(|e| matches!(e, FlowEvent::CheckpointCompleted { checkpoint: Checkpoint::Q1 })));
    assert!(flow.take_events().is_empty());
}
