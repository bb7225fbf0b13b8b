//! Parameter store accessors.
//!
//! The store is the only cross-unit shared resource: a process-wide,
//! externally persisted key/value namespace. There is no compare-and-swap
//! and no locking; concurrent writers race and the last write wins. Ordering
//! hazards are prevented by dependency edges in the orchestrator, not by
//! synchronization here.

mod http;
mod memory;
mod retry;

pub use http::HttpStore;
pub use memory::MemoryStore;
pub use retry::{get_with_retry, RetryPolicy};

use async_trait::async_trait;

use crate::config::{StoreBackend, StoreConfig};
use crate::domain::{ParamKey, Parameter};
use crate::error::{ConfigError, LookupError, Result};

/// Key/value accessor over the shared parameter namespace.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch the latest value for a key.
    ///
    /// Fails with [`LookupError::NotFound`] when the key is absent and
    /// [`LookupError::Transient`] on backend failures worth retrying.
    async fn get(&self, key: &ParamKey) -> std::result::Result<Parameter, LookupError>;

    /// Upsert a value, bumping the version counter. Returns the new version.
    async fn put(&self, key: &ParamKey, value: &str) -> std::result::Result<u64, LookupError>;
}

/// Build the configured store backend.
pub fn from_config(config: &StoreConfig) -> Result<std::sync::Arc<dyn ParameterStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(std::sync::Arc::new(MemoryStore::new())),
        StoreBackend::Http => {
            let url = config.url.as_deref().ok_or(ConfigError::MissingField {
                field: "store.url",
            })?;
            Ok(std::sync::Arc::new(HttpStore::new(url)?))
        }
    }
}
