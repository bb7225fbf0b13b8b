//! Parameter store backend selection.

use serde::Deserialize;

/// Supported store backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store for local deployments and tests.
    #[default]
    Memory,
    /// External HTTP-backed store service.
    Http,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Base URL of the store service. Required for the `http` backend;
    /// can be overridden with `MLSTACK_STORE_URL`.
    #[serde(default)]
    pub url: Option<String>,
}
