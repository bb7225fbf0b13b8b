//! Managed persistence data API client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::HandlerError;

/// Database the statement runs against, resolved from the parameter store.
#[derive(Debug, Clone)]
pub struct DbTarget {
    pub cluster_arn: String,
    pub secret_arn: String,
    pub database: String,
}

/// Executes one SQL statement through the managed data API.
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn execute(
        &self,
        target: &DbTarget,
        sql: &str,
    ) -> std::result::Result<Value, HandlerError>;
}

/// HTTP client for the data API service.
pub struct HttpDataApi {
    client: Client,
    base_url: String,
}

impl HttpDataApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DataApi for HttpDataApi {
    async fn execute(
        &self,
        target: &DbTarget,
        sql: &str,
    ) -> std::result::Result<Value, HandlerError> {
        let url = format!("{}/execute-statement", self.base_url.trim_end_matches('/'));
        debug!(cluster = %target.cluster_arn, database = %target.database, "Executing statement");

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "resourceArn": target.cluster_arn,
                "secretArn": target.secret_arn,
                "database": target.database,
                "sql": sql,
            }))
            .send()
            .await
            .map_err(|e| HandlerError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HandlerError::Upstream(format!(
                "data API returned {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HandlerError::Upstream(e.to_string()))
    }
}
