//! Bounded retry for parameter lookups.
//!
//! Readers racing a writer across deployments can observe a missing or
//! transiently unreadable key right after a publish. The observed discipline
//! is a fixed number of attempts with a fixed delay, then escalation: the
//! caller fails its own operation with the propagated error.

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use super::ParameterStore;
use crate::domain::{ParamKey, Parameter};
use crate::error::LookupError;

/// Fixed-backoff retry policy for store reads.
///
/// Every field defaults independently so a partial `[retry]` table is valid.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(with = "seconds", default = "default_delay")]
    pub delay: Duration,
}

fn default_attempts() -> u32 {
    3
}

fn default_delay() -> Duration {
    Duration::from_secs(1)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            delay: default_delay(),
        }
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Resolve a key, retrying transient failures (including the
/// eventual-consistency `NotFound` window) up to the policy's bound.
pub async fn get_with_retry(
    store: &dyn ParameterStore,
    key: &ParamKey,
    policy: RetryPolicy,
) -> Result<Parameter, LookupError> {
    let mut last: Option<LookupError> = None;

    for attempt in 1..=policy.attempts.max(1) {
        match store.get(key).await {
            Ok(param) => {
                info!(key = %key, attempt, version = param.version, "Parameter resolved");
                return Ok(param);
            }
            Err(err) => {
                warn!(key = %key, attempt, error = %err, "Parameter lookup failed");
                last = Some(err);
                if attempt < policy.attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    Err(LookupError::Exhausted {
        key: key.to_string(),
        attempts: policy.attempts.max(1),
        last: last
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".to_string()),
    })
}
