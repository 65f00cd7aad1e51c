//! Shared handler state. Holds collaborators only; no per-request data.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use lti_grade_core::api::{GradeConfig, GradePassback, LaunchContextGate, Services};
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub gate: LaunchContextGate,
    pub passback: GradePassback,
    pub grade: Arc<GradeConfig>,
    pub stats: Arc<RwLock<ServerStats>>,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(services: Services, grade: GradeConfig, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            gate: LaunchContextGate::new(services.launch.clone()),
            passback: GradePassback::new(services.grades.clone()),
            services,
            grade: Arc::new(grade),
            stats: Arc::new(RwLock::new(ServerStats::new())),
            shutdown_tx,
        }
    }

    pub fn record_request(&self, route: &str) {
        if let Ok(mut stats) = self.stats.write() {
            stats.increment_request(route);
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.increment_error();
        }
    }
}

/// Request counters reported by `/health`.
#[derive(Debug)]
pub struct ServerStats {
    pub started_at: Instant,
    pub requests: HashMap<String, u64>,
    pub errors: u64,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            requests: HashMap::new(),
            errors: 0,
        }
    }

    pub fn increment_request(&mut self, route: &str) {
        *self.requests.entry(route.to_string()).or_insert(0) += 1;
    }

    pub fn increment_error(&mut self) {
        self.errors += 1;
    }

    pub fn total_requests(&self) -> u64 {
        self.requests.values().sum()
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}
