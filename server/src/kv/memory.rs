//! Process-local store used for development and tests.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{KvError, KvStore};

#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), KvError> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
