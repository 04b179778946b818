//! Local like cache.
//!
//! DESIGN
//! ======
//! Maps slug to the personal like count this browser last saw. It is only an
//! optimistic hint for first paint; reconciliation raises it to whatever the
//! server reports and never lowers it below what was already shown.

#[cfg(test)]
#[path = "likes_test.rs"]
mod likes_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wire::MAX_LIKES_PER_USER;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LikeCache {
    counts: BTreeMap<String, u32>,
}

impl LikeCache {
    pub fn get(&self, slug: &str) -> u32 {
        self.counts.get(slug).copied().unwrap_or(0)
    }

    pub fn set(&mut self, slug: &str, count: u32) {
        self.counts.insert(slug.to_owned(), count.min(MAX_LIKES_PER_USER));
    }

    pub fn is_capped(&self, slug: &str) -> bool {
        self.get(slug) >= MAX_LIKES_PER_USER
    }

    /// Raise the cached count to `server` if it is ahead. Returns the merged
    /// count.
    pub fn reconcile(&mut self, slug: &str, server: u32) -> u32 {
        let merged = self.get(slug).max(server);
        self.set(slug, merged);
        self.get(slug)
    }
}
