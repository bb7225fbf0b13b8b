//! Backend unit configuration: database and request handler functions.

use serde::Deserialize;

/// Configuration for the request handler unit.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Logical database name for handler persistence statements.
    #[serde(default = "default_database")]
    pub database: String,
    /// Base URL of the hosted-model invocation service.
    #[serde(default = "default_invocation_url")]
    pub invocation_url: String,
    /// Base URL of the managed persistence data API.
    #[serde(default = "default_data_api_url")]
    pub data_api_url: String,
    /// Per-handler timeout budgets, in seconds.
    #[serde(default = "default_generate_timeout")]
    pub generate_timeout_secs: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_secs: u64,
    #[serde(default = "default_vote_timeout")]
    pub vote_timeout_secs: u64,
}

fn default_database() -> String {
    "mlpipeline".into()
}

fn default_invocation_url() -> String {
    "https://inference.local".into()
}

fn default_data_api_url() -> String {
    "https://data-api.local".into()
}

fn default_generate_timeout() -> u64 {
    30
}

fn default_ping_timeout() -> u64 {
    30
}

fn default_vote_timeout() -> u64 {
    5
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            invocation_url: default_invocation_url(),
            data_api_url: default_data_api_url(),
            generate_timeout_secs: default_generate_timeout(),
            ping_timeout_secs: default_ping_timeout(),
            vote_timeout_secs: default_vote_timeout(),
        }
    }
}
