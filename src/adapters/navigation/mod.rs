//! Router adapters.

use std::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::ports::{RouteId, Router};

/// Router for headless hosts: logs the navigation and nothing else.
#[derive(Debug, Default)]
pub struct LoggingRouter;

impl Router for LoggingRouter {
    fn navigate_to(&self, route: &RouteId) {
        info!(%route, "Navigating away from flow");
    }
}

/// Router that remembers every navigation, for tests.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    visited: Mutex<Vec<RouteId>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes navigated to, oldest first.
    pub fn visited(&self) -> Vec<RouteId> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<RouteId> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RouteId>> {
        // Pushes are single operations, so a poisoned list is still whole.
        self.visited.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Router for RecordingRouter {
    fn navigate_to(&self, route: &RouteId) {
        self.lock().push(route.clone());
    }
}
