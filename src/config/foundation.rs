//! Foundation unit configuration: durable storage and the execution identity.

use serde::Deserialize;

/// Configuration for the foundational resources unit.
#[derive(Debug, Clone, Deserialize)]
pub struct FoundationConfig {
    /// Key prefix under which model artifacts live in the bucket.
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,
    /// Initial model version tag seeded into the parameter store.
    #[serde(default = "default_model_version")]
    pub model_version: String,
    /// Days before captured request/response data transitions to cold storage.
    #[serde(default = "default_transition_days")]
    pub capture_transition_days: u32,
    /// Days before captured data expires.
    #[serde(default = "default_expiration_days")]
    pub capture_expiration_days: u32,
    /// Days before noncurrent artifact versions are pruned.
    #[serde(default = "default_noncurrent_days")]
    pub noncurrent_version_days: u32,
}

fn default_artifact_prefix() -> String {
    "gpt2-v1".into()
}

fn default_model_version() -> String {
    "v1".into()
}

fn default_transition_days() -> u32 {
    30
}

fn default_expiration_days() -> u32 {
    365
}

fn default_noncurrent_days() -> u32 {
    90
}

impl Default for FoundationConfig {
    fn default() -> Self {
        Self {
            artifact_prefix: default_artifact_prefix(),
            model_version: default_model_version(),
            capture_transition_days: default_transition_days(),
            capture_expiration_days: default_expiration_days(),
            noncurrent_version_days: default_noncurrent_days(),
        }
    }
}

impl FoundationConfig {
    /// Bucket prefix receiving endpoint data capture.
    pub fn capture_prefix(&self) -> String {
        format!("{}/data-capture/", self.artifact_prefix)
    }
}
