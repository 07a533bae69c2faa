//! scorecard-im library interface
//!
//! Exposes the application state, router, and pipeline services for
//! integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::directory::{PersonDirectory, SqlitePersonDirectory};
use crate::services::ingest_engine::IngestEngine;
use crate::services::notifier::{Notifier, WebhookNotifier};
use scorecard_common::{Clock, SystemClock};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Person directory read path (fresh lookup per row)
    pub directory: Arc<dyn PersonDirectory>,
    /// Best-effort digest delivery
    pub notifier: Arc<dyn Notifier>,
    /// Injected time source; period defaulting never reads the wall clock
    /// directly
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        directory: Arc<dyn PersonDirectory>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            directory,
            notifier,
            clock,
        }
    }

    /// Production wiring: sqlite-backed directory, webhook notifier,
    /// system clock
    pub fn with_defaults(db: SqlitePool, notify_webhook_url: Option<String>) -> Self {
        let directory = Arc::new(SqlitePersonDirectory::new(db.clone()));
        let notifier = Arc::new(WebhookNotifier::new(notify_webhook_url));
        Self::new(db, directory, notifier, Arc::new(SystemClock))
    }

    /// Build an ingestion engine over this state's collaborators
    pub fn engine(&self) -> IngestEngine {
        IngestEngine::new(
            self.db.clone(),
            Arc::clone(&self.directory),
            Arc::clone(&self.notifier),
            Arc::clone(&self.clock),
        )
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health::routes())
        .merge(api::mapping::routes())
        .merge(api::ingest::routes())
        .merge(api::records::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
