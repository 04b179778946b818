//! JSON values in `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Persisted client state (the like cache) is a convenience. Read failures
//! and malformed JSON yield `None`; write failures are logged and dropped.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use leptos::logging::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::host::Storage;

/// Load a JSON value from storage for `key`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("storage: could not read {key}: {e}");
            return None;
        }
    };
    serde_json::from_str(&raw).ok()
}

/// Save a JSON value to storage for `key`. Returns whether it was written.
pub fn save_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) -> bool {
    let Ok(raw) = serde_json::to_string(value) else {
        return false;
    };
    match storage.set_item(key, &raw) {
        Ok(()) => true,
        Err(e) => {
            warn!("storage: could not write {key}: {e}");
            false
        }
    }
}
