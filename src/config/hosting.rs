//! Inference hosting unit configuration.

use serde::Deserialize;

/// Serving capacity for the hosted endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CapacityConfig {
    /// Dedicated instances behind the endpoint.
    Instance {
        instance_type: String,
        initial_count: u32,
    },
    /// On-demand serverless capacity.
    Serverless {
        memory_mb: u32,
        max_concurrency: u32,
    },
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self::Instance {
            instance_type: "ml.m5.large".into(),
            initial_count: 1,
        }
    }
}

/// Request/response capture settings. Additive: a misconfigured section
/// degrades to a warning at synthesis and never blocks endpoint creation.
#[derive(Debug, Clone, Deserialize)]
pub struct DataCaptureConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sampling")]
    pub sampling_percentage: u32,
}

fn default_sampling() -> u32 {
    100
}

impl Default for DataCaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sampling_percentage: default_sampling(),
        }
    }
}

/// Configuration for the inference hosting unit.
#[derive(Debug, Clone, Deserialize)]
pub struct HostingConfig {
    /// Stable, caller-chosen endpoint name. Downstream consumers resolve the
    /// endpoint by this name and stay valid across hosting redeploys.
    #[serde(default = "default_endpoint_name")]
    pub endpoint_name: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Serving container image reference.
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default)]
    pub capacity: CapacityConfig,
    #[serde(default)]
    pub data_capture: DataCaptureConfig,
    /// Email subscribed to the 5XX alarm topic. Additive monitoring; empty
    /// or absent disables the alarm.
    #[serde(default)]
    pub alarm_email: Option<String>,
}

fn default_endpoint_name() -> String {
    "gpt2-endpoint".into()
}

fn default_model_name() -> String {
    "gpt2-model".into()
}

fn default_image() -> String {
    "registry.local/huggingface-pytorch-inference:cpu".into()
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            endpoint_name: default_endpoint_name(),
            model_name: default_model_name(),
            image: default_image(),
            capacity: CapacityConfig::default(),
            data_capture: DataCaptureConfig::default(),
            alarm_email: None,
        }
    }
}
