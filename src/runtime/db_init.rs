//! One-shot database initialization, invoked by the deployment trigger
//! rather than an HTTP route.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::adapter::{DataApi, DbTarget};
use crate::domain::keys;
use crate::error::HandlerError;
use crate::store::{get_with_retry, ParameterStore, RetryPolicy};

const CREATE_FEEDBACK_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS feedback (
    id SERIAL PRIMARY KEY,
    vote TEXT,
    model TEXT,
    prompt TEXT,
    response TEXT,
    timestamp TIMESTAMPTZ DEFAULT now()
);";

/// Trigger-style report, not an HTTP response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "UPPERCASE")]
pub enum DbInitOutcome {
    Success { message: String },
    Failed { reason: String },
}

pub struct DbInitHandler {
    target: DbTarget,
    data_api: Arc<dyn DataApi>,
}

impl DbInitHandler {
    pub async fn initialize(
        store: &dyn ParameterStore,
        data_api: Arc<dyn DataApi>,
        retry: RetryPolicy,
        database: impl Into<String>,
    ) -> Result<Self, HandlerError> {
        let cluster = get_with_retry(store, &keys::db_cluster_arn(), retry)
            .await
            .map_err(|e| HandlerError::Configuration(e.to_string()))?;
        let secret = get_with_retry(store, &keys::db_secret_arn(), retry)
            .await
            .map_err(|e| HandlerError::Configuration(e.to_string()))?;

        Ok(Self {
            target: DbTarget {
                cluster_arn: cluster.value,
                secret_arn: secret.value,
                database: database.into(),
            },
            data_api,
        })
    }

    /// Run the idempotent schema statement.
    pub async fn run(&self) -> DbInitOutcome {
        match self
            .data_api
            .execute(&self.target, CREATE_FEEDBACK_TABLE)
            .await
        {
            Ok(result) => {
                info!(?result, "Feedback table ready");
                DbInitOutcome::Success {
                    message: "feedback table created or already exists".into(),
                }
            }
            Err(err) => {
                error!(error = %err, "Failed to create feedback table");
                DbInitOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
