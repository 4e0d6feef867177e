use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::domain::store::{KeyValueStore, StoreError};

/// Process-local store for tests and throwaway sessions. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize { self.writes.lock().map(|n| *n).unwrap_or_default() }
}

fn poisoned<E: std::fmt::Display>(err: E) -> StoreError {
    StoreError::Backend { reason: format!("lock poisoned: {err}") }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.lock().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.lock().map_err(poisoned)?.insert(key.to_string(), value.to_string());
        *self.writes.lock().map_err(poisoned)? += 1;
        Ok(())
    }
}
