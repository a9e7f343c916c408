pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod records;
pub mod services;
pub mod static_files;
pub mod storage;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::records::RecordStore;
use crate::storage::PhotoStorage;

/// Upper bound on a registration request body
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub records: Arc<dyn RecordStore>,
    pub photos: Arc<dyn PhotoStorage>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        records: Arc<dyn RecordStore>,
        photos: Arc<dyn PhotoStorage>,
    ) -> Self {
        Self {
            config,
            records,
            photos,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // The form page is served from its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new().route("/register", post(handlers::register::register));

    let public_prefix = state.config.storage.public_prefix.clone();
    let uploads = static_files::uploads_service(&state.config.storage.upload_dir);

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&public_prefix, uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
