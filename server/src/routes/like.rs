//! `GET/POST /api/like` handlers.
//!
//! Handlers resolve the slug and caller identity, delegate to
//! [`LikeService`](crate::services::likes::LikeService), and map failures to
//! `{error}` bodies.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use wire::{ErrorBody, LikeRequest, LikeStatus};

use crate::identity::identity_from_headers;
use crate::services::likes::LikeError;
use crate::state::AppState;

const MISSING_SLUG: &str = "Missing slug";
const INVALID_BODY: &str = "Invalid request body";
const INVALID_QUERY: &str = "Invalid query string";
const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Deserialize)]
pub struct LikeQuery {
    pub slug: Option<String>,
}

/// Map a like failure to its HTTP status and public message.
pub(crate) fn like_error_to_status(err: &LikeError) -> (StatusCode, &'static str) {
    match err {
        LikeError::MissingSlug => (StatusCode::BAD_REQUEST, MISSING_SLUG),
        LikeError::Store(_) | LikeError::Corrupt { .. } => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

fn status_response(result: Result<LikeStatus, LikeError>, action: &'static str) -> Response {
    match result {
        Ok(status) => (
            [(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"))],
            Json(status),
        )
            .into_response(),
        Err(e) => {
            let (code, message) = like_error_to_status(&e);
            if code.is_server_error() {
                tracing::error!(error = %e, action, "like request failed");
            }
            error_response(code, message)
        }
    }
}

/// `GET /api/like?slug=<slug>`: counters for one item as seen by the caller.
pub async fn get_like(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<LikeQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed like query");
            return error_response(StatusCode::BAD_REQUEST, INVALID_QUERY);
        }
    };
    let identity = identity_from_headers(&headers);
    let result = state.likes.status(query.slug.as_deref(), &identity).await;
    status_response(result, "get")
}

/// `POST /api/like` with `{slug}`: add one like from the caller.
pub async fn post_like(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request: LikeRequest = if body.is_empty() {
        LikeRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "rejecting malformed like body");
                return error_response(StatusCode::BAD_REQUEST, INVALID_BODY);
            }
        }
    };

    let identity = identity_from_headers(&headers);
    let result = state.likes.like(request.slug.as_deref(), &identity).await;
    status_response(result, "post")
}

#[cfg(test)]
#[path = "like_test.rs"]
mod tests;
