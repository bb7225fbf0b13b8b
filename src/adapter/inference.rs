//! Hosted-model invocation client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::HandlerError;

/// Invokes a hosted model endpoint by its stable name.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &Value,
    ) -> std::result::Result<Value, HandlerError>;
}

/// HTTP client for the hosted-model invocation service.
///
/// Posts the payload as JSON to `{base}/endpoints/{name}/invocations` and
/// returns the service's JSON response unmodified.
pub struct HttpInferenceClient {
    client: Client,
    base_url: String,
}

impl HttpInferenceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &Value,
    ) -> std::result::Result<Value, HandlerError> {
        let url = format!(
            "{}/endpoints/{endpoint_name}/invocations",
            self.base_url.trim_end_matches('/')
        );
        debug!(endpoint = endpoint_name, url = %url, "Invoking hosted model");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| HandlerError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HandlerError::Upstream(format!(
                "invocation returned {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HandlerError::Upstream(e.to_string()))
    }
}
