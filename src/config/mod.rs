//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for deployment-scoped values like the store URL.

use serde::Deserialize;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::store::RetryPolicy;

mod backend;
mod edge;
mod foundation;
mod hosting;
mod logging;
mod store;

pub use backend::BackendConfig;
pub use edge::{AccessPosture, EdgeConfig};
pub use foundation::FoundationConfig;
pub use hosting::{CapacityConfig, DataCaptureConfig, HostingConfig};
pub use logging::LoggingConfig;
pub use store::{StoreBackend, StoreConfig};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Retry policy applied to deploy-time and cold-start parameter reads.
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub foundation: FoundationConfig,
    #[serde(default)]
    pub hosting: HostingConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub edge: EdgeConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        // Deployment-scoped override; never baked into the config file.
        if let Ok(url) = std::env::var("MLSTACK_STORE_URL") {
            config.store.url = Some(url);
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.retry.attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.attempts",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.hosting.endpoint_name.is_empty() {
            return Err(ConfigError::MissingField {
                field: "hosting.endpoint_name",
            }
            .into());
        }
        if self.hosting.model_name.is_empty() {
            return Err(ConfigError::MissingField {
                field: "hosting.model_name",
            }
            .into());
        }
        if self.backend.generate_timeout_secs == 0
            || self.backend.ping_timeout_secs == 0
            || self.backend.vote_timeout_secs == 0
        {
            return Err(ConfigError::InvalidValue {
                field: "backend timeouts",
                reason: "timeout budgets must be positive".into(),
            }
            .into());
        }
        if self.edge.enabled && self.edge.domain.is_empty() {
            return Err(ConfigError::MissingField {
                field: "edge.domain",
            }
            .into());
        }
        if self.store.backend == StoreBackend::Http && self.store.url.is_none() {
            return Err(ConfigError::MissingField { field: "store.url" }.into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
