//! Composite reflectivity API service.
//!
//! Single-purpose HTTP server: locate the newest Level-II volume for the
//! configured site and answer with a rendered composite reflectivity PNG.

pub mod handlers;
pub mod pipeline;
pub mod state;

use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Station served by this deployment.
pub const DEFAULT_SITE: &str = "KNQA";

/// Build the application router around an injected state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::radar_handler))
        .route("/health", get(handlers::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
