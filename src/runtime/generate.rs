//! `/generate` handler: validate `inputs`, invoke the hosted model once,
//! return its result verbatim.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::{error, info};

use super::event::{Cors, HttpRequest, HttpResponse, Method};
use crate::adapter::InferenceClient;
use crate::domain::keys;
use crate::error::HandlerError;
use crate::store::{get_with_retry, ParameterStore, RetryPolicy};

pub struct GenerateHandler {
    endpoint_name: String,
    inference: Arc<dyn InferenceClient>,
    timeout: Duration,
    cors: Cors,
}

impl std::fmt::Debug for GenerateHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateHandler")
            .field("endpoint_name", &self.endpoint_name)
            .field("timeout", &self.timeout)
            .field("cors", &self.cors)
            .finish_non_exhaustive()
    }
}

impl GenerateHandler {
    /// Cold start: resolve the endpoint name with bounded retry and cache it
    /// for the life of this instance. Fails closed on exhaustion.
    pub async fn initialize(
        store: &dyn ParameterStore,
        inference: Arc<dyn InferenceClient>,
        retry: RetryPolicy,
        timeout: Duration,
        cors: Cors,
    ) -> Result<Self, HandlerError> {
        let started = Instant::now();

        let endpoint = get_with_retry(store, &keys::endpoint_name(), retry)
            .await
            .map_err(|e| {
                HandlerError::Configuration(format!("Failed to fetch endpoint name: {e}"))
            })?;

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            endpoint = %endpoint.value,
            "Cold start complete"
        );

        Ok(Self {
            endpoint_name: endpoint.value,
            inference,
            timeout,
            cors,
        })
    }

    pub async fn handle(&self, request: &HttpRequest) -> HttpResponse {
        if request.method == Method::Options {
            return HttpResponse::preflight(&self.cors);
        }

        let body = request.body.as_deref().unwrap_or("{}");
        let parsed: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => return HttpResponse::error(400, "Invalid JSON payload.", &self.cors),
        };

        let prompt = match parsed.get("inputs").and_then(Value::as_str) {
            Some(prompt) if !prompt.is_empty() => prompt,
            _ => {
                return HttpResponse::error(400, "Missing or empty 'inputs' field.", &self.cors)
            }
        };

        let payload = json!({ "inputs": prompt });
        let invocation = tokio::time::timeout(
            self.timeout,
            self.inference.invoke(&self.endpoint_name, &payload),
        )
        .await;

        match invocation {
            Ok(Ok(result)) => {
                info!(prompt, "Inference succeeded");
                HttpResponse::json(200, &result, &self.cors)
            }
            Ok(Err(err)) => {
                error!(error = %err, "Inference invocation failed");
                HttpResponse::error(502, format!("Invocation failed: {err}"), &self.cors)
            }
            Err(_) => {
                let err = HandlerError::Timeout {
                    budget: self.timeout,
                };
                error!(error = %err, "Inference invocation timed out");
                HttpResponse::error(502, format!("Invocation failed: {err}"), &self.cors)
            }
        }
    }
}
