//! Parameter namespace types.
//!
//! Parameters are the only channel for passing identifiers between
//! independently deployed units: a unit publishes what it created, and
//! downstream units (or runtime handlers) resolve those keys by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hierarchical string key in the shared parameter namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamKey(String);

impl ParamKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParamKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// One published parameter value.
///
/// `version` is a monotonic counter bumped on every upsert; the key uniquely
/// identifies the latest value within a deployment scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: ParamKey,
    pub value: String,
    pub version: u64,
    pub modified_at: DateTime<Utc>,
}

/// Well-known keys shared between deployment units.
///
/// Each key is written by exactly one unit; the orchestrator enforces that
/// any reader declares the writer as a predecessor.
pub mod keys {
    use super::ParamKey;

    pub fn model_artifact_bucket() -> ParamKey {
        ParamKey::new("/ml-pipeline/s3/model-artifact-bucket")
    }

    pub fn execution_role_arn() -> ParamKey {
        ParamKey::new("/ml-pipeline/sagemaker/execution-role-arn")
    }

    pub fn model_version() -> ParamKey {
        ParamKey::new("/ml-pipeline/model/latest-version")
    }

    pub fn endpoint_name() -> ParamKey {
        ParamKey::new("/ml-pipeline/sagemaker/endpoint-name")
    }

    pub fn db_cluster_arn() -> ParamKey {
        ParamKey::new("/ml-pipeline/db/cluster-arn")
    }

    pub fn db_secret_arn() -> ParamKey {
        ParamKey::new("/ml-pipeline/db/secret-arn")
    }

    pub fn api_url() -> ParamKey {
        ParamKey::new("/ml-pipeline/api/url")
    }

    pub fn distribution_id() -> ParamKey {
        ParamKey::new("/ml-pipeline/edge/distribution-id")
    }

    pub fn frontend_bucket() -> ParamKey {
        ParamKey::new("/ml-pipeline/s3/frontend-bucket")
    }

    /// Entry-point identifier for one backend handler, published so the edge
    /// unit can bind routes without holding an object reference.
    pub fn handler_entry_point(handler: &str) -> ParamKey {
        ParamKey::new(format!("/ml-pipeline/backend/{handler}-fn-arn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_matches_raw_value() {
        let key = keys::endpoint_name();
        assert_eq!(key.to_string(), "/ml-pipeline/sagemaker/endpoint-name");
        assert_eq!(key.as_str(), "/ml-pipeline/sagemaker/endpoint-name");
    }

    #[test]
    fn handler_entry_point_is_namespaced_per_handler() {
        assert_eq!(
            keys::handler_entry_point("generate").as_str(),
            "/ml-pipeline/backend/generate-fn-arn"
        );
        assert_ne!(
            keys::handler_entry_point("ping"),
            keys::handler_entry_point("vote")
        );
    }
}
