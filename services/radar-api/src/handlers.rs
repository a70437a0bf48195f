//! HTTP request handlers.

use axum::{
    body::Body,
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, instrument, warn};

use storage::Locate;

use crate::state::AppState;

/// Body returned when no volume is available for the current hour.
pub const NO_RADAR_MESSAGE: &str = "No radar file found.";

/// GET / - composite reflectivity for the newest scan of the hour.
///
/// Locate failures are reported to the client exactly like an empty hour;
/// the distinction only reaches the logs.
#[instrument(skip(state))]
pub async fn radar_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let located = match state.locator.latest_scan().await {
        Ok(located) => located,
        Err(e) => {
            warn!(error = %e, "Locate failed; answering as not found");
            Locate::NotFound
        }
    };

    let key = match located {
        Locate::Found(key) => key,
        Locate::NotFound => {
            return (StatusCode::OK, NO_RADAR_MESSAGE).into_response();
        }
    };

    match state.renderer.render(&key).await {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(png))
            .unwrap(),
        Err(e) => {
            error!(error = %e, key = %key, "Rendering failed");
            let status = StatusCode::from_u16(e.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "Radar rendering failed.").into_response()
        }
    }
}

/// GET /health - basic liveness check.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
