//! `/ping` handler: liveness probe through the hosted endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tracing::{error, info};

use super::event::{Cors, HttpRequest, HttpResponse, Method};
use crate::adapter::InferenceClient;
use crate::domain::keys;
use crate::error::HandlerError;
use crate::store::{get_with_retry, ParameterStore, RetryPolicy};

/// Literal probe payload echoed back by the inference service.
pub const PROBE_PAYLOAD: &str = "__ping__";

pub struct PingHandler {
    endpoint_name: String,
    inference: Arc<dyn InferenceClient>,
    timeout: Duration,
    cors: Cors,
}

impl PingHandler {
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
            .map_err(|e| HandlerError::Configuration(format!("Parameter fetch failed: {e}")))?;

        info!(
            duration_ms = started.elapsed().as_millis() as u64,
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

        let payload = json!({ "inputs": PROBE_PAYLOAD });
        let invocation = tokio::time::timeout(
            self.timeout,
            self.inference.invoke(&self.endpoint_name, &payload),
        )
        .await;

        match invocation {
            Ok(Ok(result)) => {
                info!("Ping succeeded");
                HttpResponse::json(
                    200,
                    &json!({ "message": "Ping successful", "result": result }),
                    &self.cors,
                )
            }
            Ok(Err(err)) => {
                error!(error = %err, "Ping failed");
                HttpResponse::error(502, format!("Ping failed: {err}"), &self.cors)
            }
            Err(_) => {
                let err = HandlerError::Timeout {
                    budget: self.timeout,
                };
                error!(error = %err, "Ping timed out");
                HttpResponse::error(502, format!("Ping failed: {err}"), &self.cors)
            }
        }
    }
}
