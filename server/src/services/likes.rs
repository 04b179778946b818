//! Like counter service.
//!
//! DESIGN
//! ======
//! One JSON record per content slug under `like:<slug>`:
//! `{count, likes: {identity_hash: n}}`. Records are created lazily on the
//! first like and never deleted. `count` always equals the sum of `likes`
//! and no identity exceeds [`MAX_LIKES_PER_USER`].
//!
//! TRADE-OFFS
//! ==========
//! A like is read-record, mutate-in-memory, write-record with no version
//! token. Two concurrent POSTs for the same slug can both read the same
//! record and the later write drops the earlier increment (and two racing
//! POSTs from one identity can slip past the cap check together). This is a
//! vanity counter; the race is accepted rather than papered over with
//! locking the backing store cannot enforce across instances.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wire::{LikeStatus, MAX_LIKES_PER_USER};

use crate::identity::IdentityHash;
use crate::kv::{KvError, KvStore};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    #[error("missing slug")]
    MissingSlug,
    #[error(transparent)]
    Store(#[from] KvError),
    #[error("corrupt like record for '{slug}': {source}")]
    Corrupt { slug: String, source: serde_json::Error },
}

// =============================================================================
// RECORD
// =============================================================================

/// Persisted like state for one slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRecord {
    pub count: u64,
    #[serde(default)]
    pub likes: BTreeMap<String, u32>,
}

/// Result of applying one like to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// Both counters advanced by one; the identity now has `user_likes`.
    Counted { user_likes: u32 },
    /// The identity was already at the cap; nothing changed.
    AtCap { user_likes: u32 },
}

impl LikeRecord {
    #[must_use]
    pub fn user_likes(&self, identity: &IdentityHash) -> u32 {
        self.likes.get(identity.as_str()).copied().unwrap_or(0)
    }

    /// Add one like for `identity` unless it is already at the cap.
    pub fn apply_like(&mut self, identity: &IdentityHash) -> LikeOutcome {
        let current = self.user_likes(identity);
        if current >= MAX_LIKES_PER_USER {
            return LikeOutcome::AtCap { user_likes: current };
        }
        let next = current + 1;
        self.count += 1;
        self.likes.insert(identity.as_str().to_owned(), next);
        LikeOutcome::Counted { user_likes: next }
    }

    /// `count == sum(likes)` and every identity is within the cap.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let sum: u64 = self.likes.values().map(|&n| u64::from(n)).sum();
        sum == self.count && self.likes.values().all(|&n| n <= MAX_LIKES_PER_USER)
    }

    fn status_for(&self, user_likes: u32, max_reached: bool) -> LikeStatus {
        LikeStatus { count: self.count, user_likes, max_likes: MAX_LIKES_PER_USER, max_reached }
    }
}

#[must_use]
pub fn record_key(slug: &str) -> String {
    format!("like:{slug}")
}

// =============================================================================
// SERVICE
// =============================================================================

/// Like operations over an optional store. `None` means the store is not
/// provisioned and every call answers with the documented mock shape.
#[derive(Clone)]
pub struct LikeService {
    kv: Option<Arc<dyn KvStore>>,
}

impl LikeService {
    #[must_use]
    pub fn new(kv: Option<Arc<dyn KvStore>>) -> Self {
        Self { kv }
    }

    #[cfg(test)]
    pub fn is_mock(&self) -> bool {
        self.kv.is_none()
    }

    /// Current counters for `slug` as seen by `identity`.
    ///
    /// # Errors
    ///
    /// [`LikeError::MissingSlug`] for an empty slug; store and decode failures
    /// otherwise.
    pub async fn status(&self, slug: Option<&str>, identity: &IdentityHash) -> Result<LikeStatus, LikeError> {
        let slug = wire::normalize_slug(slug).ok_or(LikeError::MissingSlug)?;
        let Some(kv) = &self.kv else {
            return Ok(LikeStatus::empty());
        };

        let record = load_record(kv.as_ref(), slug).await?.unwrap_or_default();
        Ok(record.status_for(record.user_likes(identity), false))
    }

    /// Record one like from `identity`, or report the cap without mutating.
    ///
    /// # Errors
    ///
    /// [`LikeError::MissingSlug`] for an empty slug; store and decode failures
    /// otherwise.
    pub async fn like(&self, slug: Option<&str>, identity: &IdentityHash) -> Result<LikeStatus, LikeError> {
        let slug = wire::normalize_slug(slug).ok_or(LikeError::MissingSlug)?;
        let Some(kv) = &self.kv else {
            return Ok(LikeStatus { count: 1, user_likes: 1, max_likes: MAX_LIKES_PER_USER, max_reached: false });
        };

        let mut record = load_record(kv.as_ref(), slug).await?.unwrap_or_default();
        match record.apply_like(identity) {
            LikeOutcome::AtCap { user_likes } => {
                tracing::debug!(%slug, user_likes, "like ignored at per-user cap");
                Ok(record.status_for(user_likes, true))
            }
            LikeOutcome::Counted { user_likes } => {
                let raw = serde_json::to_string(&record)
                    .map_err(|source| LikeError::Corrupt { slug: slug.to_owned(), source })?;
                kv.put(&record_key(slug), raw).await?;
                tracing::info!(%slug, count = record.count, user_likes, "like recorded");
                Ok(record.status_for(user_likes, false))
            }
        }
    }
}

async fn load_record(kv: &dyn KvStore, slug: &str) -> Result<Option<LikeRecord>, LikeError> {
    let Some(raw) = kv.get(&record_key(slug)).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| LikeError::Corrupt { slug: slug.to_owned(), source })
}

#[cfg(test)]
#[path = "likes_test.rs"]
mod tests;
