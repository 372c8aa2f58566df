//! snapcart-ai library interface
//!
//! Photo → shopping search term inference, exposed for the binary and for
//! integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod fusion;
pub mod services;
pub mod types;
pub mod utils;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use services::StoreLinks;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use workflow::InferencePipeline;

/// Largest accepted photo upload
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Product database
    pub db: SqlitePool,
    /// Search-only pipeline
    pub quick: Arc<InferencePipeline>,
    /// Pipeline with category guess
    pub catalog: Arc<InferencePipeline>,
    /// Store search link builder
    pub links: Arc<StoreLinks>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        quick: InferencePipeline,
        catalog: InferencePipeline,
        links: StoreLinks,
    ) -> Self {
        Self {
            db,
            quick: Arc::new(quick),
            catalog: Arc::new(catalog),
            links: Arc::new(links),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember an error for `/health`
    pub async fn record_error(&self, message: &str) {
        *self.last_error.write().await = Some(message.to_string());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::infer_routes())
        .merge(api::product_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
