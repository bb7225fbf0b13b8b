//! Foundational resources: artifact storage and the execution identity.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::{DeploymentUnit, Materialized, SynthInputs};
use crate::config::FoundationConfig;
use crate::domain::{keys, LogicalId, ParamKey, Resource, ResourceGraph, ResourceKind};
use crate::error::Result;
use crate::store::ParameterStore;

const ARTIFACT_BUCKET: &str = "ModelArtifactBucket";
const EXECUTION_ROLE: &str = "ExecutionRole";

/// Creates the versioned artifact bucket and the hosted-model execution
/// role, then publishes their identifiers and the initial model version tag.
pub struct FoundationUnit {
    config: FoundationConfig,
}

impl FoundationUnit {
    pub fn new(config: FoundationConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DeploymentUnit for FoundationUnit {
    fn name(&self) -> &'static str {
        "foundation"
    }

    fn writes(&self) -> Vec<ParamKey> {
        vec![
            keys::model_artifact_bucket(),
            keys::execution_role_arn(),
            keys::model_version(),
        ]
    }

    fn synthesize(&self, _inputs: &SynthInputs) -> Result<ResourceGraph> {
        let mut graph = ResourceGraph::new();

        graph.push(Resource::new(
            ARTIFACT_BUCKET,
            ResourceKind::Bucket,
            json!({
                "versioned": true,
                "lifecycle_rules": [
                    {
                        "id": "CaptureToColdStorageExpire",
                        "prefix": self.config.capture_prefix(),
                        "transition_after_days": self.config.capture_transition_days,
                        "transition_storage_class": "cold-instant-retrieval",
                        "expiration_days": self.config.capture_expiration_days,
                    },
                    {
                        "id": "ArtifactsToInfrequentAccess",
                        "prefix": format!("{}/", self.config.artifact_prefix),
                        "transition_after_days": self.config.capture_transition_days,
                        "transition_storage_class": "infrequent-access",
                        "noncurrent_version_expiration_days": self.config.noncurrent_version_days,
                    },
                ],
            }),
        ))?;

        graph.push(Resource::new(
            EXECUTION_ROLE,
            ResourceKind::Role,
            json!({
                "assumed_by": "hosted-model-service",
                "managed_policies": ["storage-read-only", "hosted-model-full-access"],
            }),
        ))?;

        graph.validate()?;
        Ok(graph)
    }

    async fn publish(
        &self,
        materialized: &Materialized,
        store: &dyn ParameterStore,
    ) -> Result<()> {
        let bucket = materialized.physical(&LogicalId::new(ARTIFACT_BUCKET))?;
        let role = materialized.physical(&LogicalId::new(EXECUTION_ROLE))?;

        store.put(&keys::model_artifact_bucket(), bucket).await?;
        store.put(&keys::execution_role_arn(), role).await?;
        store
            .put(&keys::model_version(), &self.config.model_version)
            .await?;

        info!(bucket, role, version = %self.config.model_version, "Foundation identifiers published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_bucket_with_lifecycle_and_role() {
        let unit = FoundationUnit::new(FoundationConfig::default());
        let graph = unit.synthesize(&SynthInputs::new("foundation")).unwrap();

        assert_eq!(graph.len(), 2);
        let bucket = graph.get(&LogicalId::new(ARTIFACT_BUCKET)).unwrap();
        assert_eq!(bucket.kind, ResourceKind::Bucket);
        let rules = bucket.properties["lifecycle_rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["prefix"], "gpt2-v1/data-capture/");

        assert_eq!(
            graph.get(&LogicalId::new(EXECUTION_ROLE)).unwrap().kind,
            ResourceKind::Role
        );
    }
}
