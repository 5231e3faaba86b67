//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use interntrack_core::ports::DatabaseService;
use interntrack_core::service::InternshipService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Direct port access for identity plumbing (signup, sessions, verification).
    pub db: Arc<dyn DatabaseService>,
    pub internships: InternshipService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseService>, config: Arc<Config>) -> Self {
        Self {
            internships: InternshipService::new(db.clone()),
            db,
            config,
        }
    }
}
