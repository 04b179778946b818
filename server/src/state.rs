//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! only shared resource is the like service, which wraps an optional store
//! behind an `Arc` so cloning the state per request stays cheap.

use std::sync::Arc;

use crate::kv::KvStore;
use crate::services::likes::LikeService;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub likes: LikeService,
}

impl AppState {
    /// `kv: None` runs the like API in mock mode.
    #[must_use]
    pub fn new(kv: Option<Arc<dyn KvStore>>) -> Self {
        Self { likes: LikeService::new(kv) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
