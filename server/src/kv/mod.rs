//! Key-value storage for like records.
//!
//! DESIGN
//! ======
//! The store exposes whole-value `get`/`put` only. There is no
//! compare-and-swap or increment primitive, so callers that read, mutate and
//! write back a value can lose updates under concurrent writers to the same
//! key. The like service accepts that race (see `services::likes`).

pub mod memory;
pub mod rest;

pub use memory::MemoryKv;
pub use rest::RestKv;

/// Error returned by [`KvStore`] operations.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The HTTP request to the store failed before a response arrived.
    #[error("kv request failed: {0}")]
    Request(String),
    /// The store answered with a non-success status.
    #[error("kv responded with status {status}: {body}")]
    Status { status: u16, body: String },
    /// The store's response body could not be decoded.
    #[error("kv response decode failed: {0}")]
    Decode(String),
    /// The underlying HTTP client could not be constructed.
    #[error("kv client build failed: {0}")]
    ClientBuild(String),
}

/// Async whole-value key-value store. Enables mocking in tests.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the raw value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`KvError`] if the backend cannot be reached or answers with
    /// something other than a value.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`KvError`] if the write is not acknowledged.
    async fn put(&self, key: &str, value: String) -> Result<(), KvError>;
}
