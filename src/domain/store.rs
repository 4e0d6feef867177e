use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage backend failure: {reason}")]
    Backend { reason: String },
    #[error("storage unavailable")]
    Unavailable,
}

/// Host-provided string key-value storage that survives restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Replaces any prior value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
