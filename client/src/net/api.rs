//! Like API client.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Native builds: [`HttpLikeApi`] reports [`ApiError::Unavailable`]; tests
//! and headless callers supply their own [`LikeApi`].
//!
//! ERROR HANDLING
//! ==============
//! Failures surface as [`ApiError`] so the like client can keep its
//! optimistic state instead of rendering an error.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use wire::LikeStatus;
#[cfg(any(test, feature = "hydrate"))]
use wire::LIKE_ENDPOINT;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("like request failed: {0}")]
    Status(u16),
    #[error(transparent)]
    Decode(#[from] wire::WireError),
    #[error("like api is only available in the browser")]
    Unavailable,
}

/// Transport for `/api/like`.
#[allow(async_fn_in_trait)]
pub trait LikeApi {
    /// # Errors
    ///
    /// Transport, status, or decode failure.
    async fn fetch_status(&self, slug: &str) -> Result<LikeStatus, ApiError>;

    /// # Errors
    ///
    /// Transport, status, or decode failure.
    async fn post_like(&self, slug: &str) -> Result<LikeStatus, ApiError>;
}

#[cfg(any(test, feature = "hydrate"))]
fn like_status_endpoint(slug: &str) -> String {
    format!("{LIKE_ENDPOINT}?slug={}", urlencoding::encode(slug))
}

/// Same-origin HTTP implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpLikeApi;

impl LikeApi for HttpLikeApi {
    async fn fetch_status(&self, slug: &str) -> Result<LikeStatus, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(&like_status_endpoint(slug))
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;
            decode_response(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = slug;
            Err(ApiError::Unavailable)
        }
    }

    async fn post_like(&self, slug: &str) -> Result<LikeStatus, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::post(LIKE_ENDPOINT)
                .json(&wire::LikeRequest::new(slug))
                .map_err(|e| ApiError::Request(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Request(e.to_string()))?;
            decode_response(resp).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = slug;
            Err(ApiError::Unavailable)
        }
    }
}

#[cfg(feature = "hydrate")]
async fn decode_response(resp: gloo_net::http::Response) -> Result<LikeStatus, ApiError> {
    if !resp.ok() {
        return Err(ApiError::Status(resp.status()));
    }
    let body = resp.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
    Ok(wire::decode_status(&body)?)
}
