use serde::{de::DeserializeOwned, Serialize};

use crate::domain::store::KeyValueStore;

/// Typed JSON view over a [`KeyValueStore`].
///
/// Reads fall back to a caller-supplied default and writes never fail from the
/// caller's point of view; backend and codec errors are logged and dropped.
/// A failed write leaves the in-memory value authoritative for the session.
#[derive(Clone)]
pub struct StoreAdapter<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> StoreAdapter<S> {
    pub fn new(backend: S) -> Self { Self { backend } }

    pub fn backend(&self) -> &S { &self.backend }

    pub async fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(err) => {
                tracing::warn!(key, error = %err, "storage read failed; using default");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not valid; using default");
                default
            }
        }
    }

    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key, error = %err, "could not serialize value");
                return;
            }
        };
        if let Err(err) = self.backend.set(key, &raw).await {
            tracing::warn!(key, error = %err, "storage write failed; change kept in memory only");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StoreAdapter;
    use crate::domain::store::{KeyValueStore, StoreError};
    use crate::infrastructure::memory_store::MemoryStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> { Err(StoreError::Unavailable) }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend { reason: "quota exceeded".into() })
        }
    }

    #[tokio::test]
    async fn absent_key_yields_default() {
        let adapter = StoreAdapter::new(MemoryStore::new());
        let value: Vec<u32> = adapter.read("missing", vec![9]).await;
        assert_eq!(value, vec![9]);
    }

    #[tokio::test]
    async fn malformed_json_is_treated_as_absent() {
        let store = MemoryStore::new();
        store.set("tasks", "[{not json").await.unwrap();
        let adapter = StoreAdapter::new(store);
        let value: Vec<u32> = adapter.read("tasks", Vec::new()).await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn write_replaces_previous_value() {
        let adapter = StoreAdapter::new(MemoryStore::new());
        adapter.write("k", &vec![1, 2, 3]).await;
        adapter.write("k", &vec![4]).await;
        assert_eq!(adapter.backend().get("k").await.unwrap().as_deref(), Some("[4]"));
    }

    #[tokio::test]
    async fn backend_failures_never_reach_the_caller() {
        let adapter = StoreAdapter::new(BrokenStore);
        adapter.write("k", &"value").await;
        let value: String = adapter.read("k", "fallback".to_string()).await;
        assert_eq!(value, "fallback");
    }
}
