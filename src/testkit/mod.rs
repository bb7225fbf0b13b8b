//! Test doubles shared between unit and integration tests.
//!
//! Enabled with the `testkit` feature; never compiled into release builds.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::adapter::{DataApi, DbTarget, InferenceClient};
use crate::domain::{ParamKey, Parameter};
use crate::error::{HandlerError, LookupError};
use crate::store::ParameterStore;

/// Inference client that echoes the payload back and counts invocations.
#[derive(Default)]
pub struct EchoInference {
    calls: AtomicUsize,
    fail_with: Option<String>,
}

impl EchoInference {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Client whose every invocation fails with the given upstream message.
    pub fn failing(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_with: Some(message.into()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for EchoInference {
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &Value,
    ) -> Result<Value, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(HandlerError::Upstream(message.clone()));
        }
        Ok(json!({ "endpoint": endpoint_name, "echo": payload }))
    }
}

/// Data API double that records executed statements.
#[derive(Default)]
pub struct RecordingDataApi {
    statements: parking_lot::Mutex<Vec<String>>,
    fail_with: Option<String>,
}

impl RecordingDataApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            statements: parking_lot::Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        })
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().clone()
    }
}

#[async_trait]
impl DataApi for RecordingDataApi {
    async fn execute(&self, _target: &DbTarget, sql: &str) -> Result<Value, HandlerError> {
        self.statements.lock().push(sql.to_string());
        if let Some(message) = &self.fail_with {
            return Err(HandlerError::Upstream(message.clone()));
        }
        Ok(json!({ "numberOfRecordsUpdated": 0 }))
    }
}

/// Store wrapper that fails reads transiently a fixed number of times before
/// delegating to the inner store.
pub struct FlakyStore<S> {
    inner: S,
    failures_remaining: AtomicUsize,
    attempts: AtomicUsize,
}

impl<S: ParameterStore> FlakyStore<S> {
    pub fn new(inner: S, failures: usize) -> Self {
        Self {
            inner,
            failures_remaining: AtomicUsize::new(failures),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Total `get` attempts observed, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: ParameterStore> ParameterStore for FlakyStore<S> {
    async fn get(&self, key: &ParamKey) -> Result<Parameter, LookupError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(LookupError::Transient {
                key: key.to_string(),
                reason: "injected failure".into(),
            });
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &ParamKey, value: &str) -> Result<u64, LookupError> {
        self.inner.put(key, value).await
    }
}
