//! Inference hosting: model definition, serving configuration, live endpoint.
//!
//! The endpoint carries a caller-chosen stable name so downstream consumers
//! can resolve it by name across redeploys of this unit. The endpoint name is
//! published as the unit's last action, after the endpoint is live. Data
//! capture and the 5XX alarm are additive; a misconfigured section degrades
//! to a warning and never blocks endpoint creation.

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::{DeploymentUnit, Materialized, SynthInputs};
use crate::config::{CapacityConfig, HostingConfig};
use crate::domain::{keys, LogicalId, ParamKey, Resource, ResourceGraph, ResourceKind};
use crate::error::Result;
use crate::store::ParameterStore;

const MODEL: &str = "Model";
const ENDPOINT_CONFIG: &str = "EndpointConfig";
const ENDPOINT: &str = "Endpoint";
const ALARM_TOPIC: &str = "AlarmTopic";
const ERROR_ALARM: &str = "Endpoint5XXAlarm";

pub struct HostingUnit {
    config: HostingConfig,
    /// Bucket prefix under which artifacts live; owned by the foundation
    /// unit's config and shared here so both agree on the layout.
    artifact_prefix: String,
}

impl HostingUnit {
    pub fn new(config: HostingConfig, artifact_prefix: impl Into<String>) -> Self {
        Self {
            config,
            artifact_prefix: artifact_prefix.into(),
        }
    }

    fn capture_config(&self, bucket: &str, prefix: &str) -> Option<serde_json::Value> {
        if !self.config.data_capture.enabled {
            return None;
        }
        let sampling = self.config.data_capture.sampling_percentage;
        if sampling == 0 || sampling > 100 {
            warn!(
                sampling,
                "Data capture sampling percentage out of range; capture disabled"
            );
            return None;
        }
        Some(json!({
            "sampling_percentage": sampling,
            "destination": format!("s3://{bucket}/{prefix}data-capture/"),
            "capture": ["input", "output"],
        }))
    }
}

#[async_trait]
impl DeploymentUnit for HostingUnit {
    fn name(&self) -> &'static str {
        "hosting"
    }

    fn depends_on(&self) -> Vec<&'static str> {
        vec!["foundation"]
    }

    fn reads(&self) -> Vec<ParamKey> {
        vec![
            keys::model_artifact_bucket(),
            keys::execution_role_arn(),
            keys::model_version(),
        ]
    }

    fn writes(&self) -> Vec<ParamKey> {
        vec![keys::endpoint_name()]
    }

    fn synthesize(&self, inputs: &SynthInputs) -> Result<ResourceGraph> {
        let bucket = inputs.get(&keys::model_artifact_bucket())?;
        let role = inputs.get(&keys::execution_role_arn())?;
        let version = inputs.get(&keys::model_version())?;

        let mut graph = ResourceGraph::new();

        let model_data_url = format!(
            "s3://{bucket}/{}/{version}/model.tar.gz",
            self.artifact_prefix
        );

        graph.push(Resource::new(
            MODEL,
            ResourceKind::Model,
            json!({
                "name": self.config.model_name,
                "execution_role_arn": role,
                "container": {
                    "image": self.config.image,
                    "model_data_url": model_data_url,
                },
            }),
        ))?;

        let variant = match &self.config.capacity {
            CapacityConfig::Instance {
                instance_type,
                initial_count,
            } => json!({
                "variant_name": "AllTraffic",
                "model": MODEL,
                "instance_type": instance_type,
                "initial_instance_count": initial_count,
            }),
            CapacityConfig::Serverless {
                memory_mb,
                max_concurrency,
            } => json!({
                "variant_name": "AllTraffic",
                "model": MODEL,
                "serverless": {
                    "memory_mb": memory_mb,
                    "max_concurrency": max_concurrency,
                },
            }),
        };

        let mut config_props = json!({
            "name": format!("{}-config", self.config.endpoint_name),
            "production_variants": [variant],
        });
        if let Some(capture) = self.capture_config(bucket, &format!("{}/", self.artifact_prefix)) {
            config_props["data_capture"] = capture;
        }

        graph.push(
            Resource::new(ENDPOINT_CONFIG, ResourceKind::EndpointConfig, config_props)
                .depends_on(MODEL),
        )?;

        graph.push(
            Resource::new(
                ENDPOINT,
                ResourceKind::Endpoint,
                json!({
                    "name": self.config.endpoint_name,
                    "endpoint_config": ENDPOINT_CONFIG,
                }),
            )
            .depends_on(ENDPOINT_CONFIG),
        )?;

        match self.config.alarm_email.as_deref() {
            Some(email) if !email.is_empty() && email.contains('@') => {
                graph.push(Resource::new(
                    ALARM_TOPIC,
                    ResourceKind::NotificationTopic,
                    json!({ "subscriptions": [{ "protocol": "email", "endpoint": email }] }),
                ))?;
                graph.push(
                    Resource::new(
                        ERROR_ALARM,
                        ResourceKind::Alarm,
                        json!({
                            "metric": "Invocation5XXErrors",
                            "dimensions": {
                                "endpoint": self.config.endpoint_name,
                                "variant": "AllTraffic",
                            },
                            "statistic": "sum",
                            "period_secs": 60,
                            "threshold": 1,
                            "evaluation_periods": 1,
                            "topic": ALARM_TOPIC,
                        }),
                    )
                    .depends_on(ALARM_TOPIC)
                    .depends_on(ENDPOINT),
                )?;
            }
            Some(email) => {
                warn!(email, "Alarm email is not valid; 5XX alarm disabled");
            }
            None => {}
        }

        graph.validate()?;
        Ok(graph)
    }

    async fn publish(
        &self,
        materialized: &Materialized,
        store: &dyn ParameterStore,
    ) -> Result<()> {
        // The engine has already realized the graph; the stable name is only
        // published once the endpoint exists.
        let endpoint = materialized.physical(&LogicalId::new(ENDPOINT))?;

        store.put(&keys::endpoint_name(), endpoint).await?;
        info!(endpoint, "Endpoint name published");
        Ok(())
    }
}
