//! Shared like-counter wire model.
//!
//! This crate owns the JSON shapes exchanged between `server` and `client`
//! over `/api/like`, plus the storage key names both sides agree on.

/// Maximum number of likes a single identity may give one content item.
pub const MAX_LIKES_PER_USER: u32 = 16;

/// Path of the like endpoint, relative to the site origin.
pub const LIKE_ENDPOINT: &str = "/api/like";

/// `localStorage` key holding the client's `slug -> personal count` cache.
pub const LIKE_STORAGE_KEY: &str = "spacerad_likes";

/// `localStorage` key holding the persisted theme preference.
pub const THEME_STORAGE_KEY: &str = "theme-preference";

/// Error returned by [`decode_status`].
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The body was not valid like-status JSON.
    #[error("failed to decode like status: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Like counters for one content item as seen by one requester.
///
/// `max_reached` is only serialized when set, so the plain status shape is
/// exactly `{count, userLikes, maxLikes}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    /// Total likes across all identities.
    pub count: u64,
    /// Likes given by the requesting identity.
    pub user_likes: u32,
    /// Per-identity cap.
    #[serde(default = "default_max_likes")]
    pub max_likes: u32,
    /// Set when a POST hit the cap and nothing was mutated.
    #[serde(default, skip_serializing_if = "is_false")]
    pub max_reached: bool,
}

impl LikeStatus {
    /// Status for a slug nobody has liked yet.
    #[must_use]
    pub fn empty() -> Self {
        Self { count: 0, user_likes: 0, max_likes: MAX_LIKES_PER_USER, max_reached: false }
    }

    /// Whether the requester has used up their likes.
    #[must_use]
    pub fn at_cap(&self) -> bool {
        self.user_likes >= self.max_likes
    }
}

/// `POST /api/like` request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LikeRequest {
    #[serde(default)]
    pub slug: Option<String>,
}

impl LikeRequest {
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self { slug: Some(slug.into()) }
    }
}

/// JSON error body returned with every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// Decode a like status from a JSON body.
///
/// # Errors
///
/// Returns [`WireError::Decode`] when `raw` is not a like-status object.
pub fn decode_status(raw: &str) -> Result<LikeStatus, WireError> {
    Ok(serde_json::from_str(raw)?)
}

/// Treat an empty slug as absent. Any other value is used verbatim as the
/// record key.
#[must_use]
pub fn normalize_slug(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

fn default_max_likes() -> u32 {
    MAX_LIKES_PER_USER
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod lib_test;
