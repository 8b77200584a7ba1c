//! Stance Flow demo binary.
//!
//! Wires the adapters selected by configuration and walks one scripted
//! session: a gated continue, sign-in from the overlay, all three layers,
//! a save, and an exit.

use std::error::Error;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stance_flow::adapters::{
    CachingContentSource, HttpContentConfig, HttpContentSource, InMemoryContentSource,
    InMemoryProgressStore, LoggingRouter, MockAuthClient,
};
use stance_flow::application::{
    ExitOutcome, FlowOptions, LoadContentHandler, LoginHandler, ResumeFlowHandler,
    SaveProgressHandler,
};
use stance_flow::config::{AppConfig, ContentSourceKind, LoggingConfig, ValidationError};
use stance_flow::domain::flow::{GateOutcome, Phase, ResponseValue};
use stance_flow::domain::foundation::{Credentials, QuestionId};
use stance_flow::ports::{AuthClient, ContentSource, ProgressStore, RouteId, Router};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "correct horse battery";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        source = ?config.content.source,
        cache = config.content.cache,
        "Starting stance-flow"
    );

    let question_id = QuestionId::new(config.flow.question_id.as_str())?;
    let content = build_content_source(&config, &question_id)?;
    let auth: Arc<dyn AuthClient> = Arc::new(MockAuthClient::new().with_account(
        DEMO_EMAIL,
        DEMO_PASSWORD,
        Some("Demo User".to_string()),
    )?);
    let store: Arc<dyn ProgressStore> = Arc::new(InMemoryProgressStore::new());
    let router: Arc<dyn Router> = Arc::new(LoggingRouter);
    let options = FlowOptions::new(
        config.flow.include_check_ins,
        RouteId::new(config.flow.exit_route.as_str())?,
    );

    let resumed = ResumeFlowHandler::new(Arc::clone(&auth), Arc::clone(&store), router, options)
        .handle(&question_id)
        .await?;
    let mut flow = resumed.controller;

    if let Some(result) = LoadContentHandler::new(content)
        .handle(&mut flow, question_id.clone())
        .await
    {
        info!(applied = result.applied, readiness = ?result.readiness, "Content loaded");
    }

    // Anonymous: continue opens the auth overlay and parks the move.
    if let GateOutcome::Blocked = flow.continue_flow()? {
        info!(pending = ?flow.pending_transition(), "Sign-in required");
    }

    let outcome = LoginHandler::new(auth, Arc::clone(&store))
        .handle(&mut flow, Credentials::new(DEMO_EMAIL, DEMO_PASSWORD))
        .await?;
    info!(user = outcome.user.display_name_or_email(), resumed_at = ?outcome.resumed_at, "Signed in");

    while flow.current_phase() != Phase::Summary {
        let phase = flow.current_phase();
        if phase.is_selection() {
            let checkpoint = phase.checkpoint().ok_or(ValidationError::MissingRequired("checkpoint"))?;
            flow.submit_selection(ResponseValue::single(format!("{}-agree", checkpoint.id()))?)?;
        } else if phase.is_review() {
            flow.confirm_review()?;
        } else if phase.is_check_in() {
            flow.submit_check_in(None)?;
        } else {
            warn!(%phase, "Unexpected phase in scripted walk");
            break;
        }
        info!(
            phase = %flow.current_phase(),
            progress = %flow.progress_percentage(),
            "Step complete"
        );
    }

    let snapshot = SaveProgressHandler::new(store).handle(&flow).await?;
    info!(completed = snapshot.completion.count(), "Progress saved");

    for recorded in flow.take_events() {
        info!(event = recorded.event.name(), "Flow event");
    }

    flow.request_exit();
    if let ExitOutcome::ReturnedToMain = flow.confirm_exit()? {
        flow.request_exit();
        flow.confirm_exit()?;
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_content_source(
    config: &AppConfig,
    question_id: &QuestionId,
) -> Result<Arc<dyn ContentSource>, Box<dyn Error>> {
    let source: Arc<dyn ContentSource> = match config.content.source {
        ContentSourceKind::InMemory => Arc::new(
            InMemoryContentSource::new()
                .with_sample_question(question_id.as_str(), "Should cars be banned from city centres?")?,
        ),
        ContentSourceKind::Http => {
            let base_url = config
                .content
                .base_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("content.base_url"))?;
            let http = HttpContentConfig::new(base_url).with_timeout(config.content.timeout());
            Arc::new(HttpContentSource::new(http)?)
        }
    };

    if config.content.cache {
        Ok(Arc::new(CachingContentSource::new(source)))
    } else {
        Ok(source)
    }
}
