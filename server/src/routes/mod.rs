//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The blog itself is a prebuilt static site. This router serves the like API
//! and a health check, and falls back to the site's files for every other
//! path.

pub mod like;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes without the static fallback.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route(wire::LIKE_ENDPOINT, get(like::get_like).post(like::post_like))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Full application: API routes, static site fallback, request tracing.
pub fn app(state: AppState, website_dir: &Path) -> Router {
    let website_service = ServeDir::new(website_dir).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(website_service)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
