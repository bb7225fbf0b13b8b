//! In-memory parameter store.
//!
//! Backs local deployments and tests. Versions are bumped under the map
//! entry's lock, which is the closest thing to atomicity the store contract
//! offers; the contract itself stays last-write-wins.

use chrono::Utc;
use dashmap::DashMap;

use super::ParameterStore;
use crate::domain::{ParamKey, Parameter};
use crate::error::LookupError;

#[derive(Debug, Default)]
pub struct MemoryStore {
    params: DashMap<ParamKey, Parameter>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys currently stored.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Snapshot of all parameters, sorted by key.
    pub fn snapshot(&self) -> Vec<Parameter> {
        let mut all: Vec<Parameter> = self.params.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        all
    }
}

#[async_trait::async_trait]
impl ParameterStore for MemoryStore {
    async fn get(&self, key: &ParamKey) -> Result<Parameter, LookupError> {
        self.params
            .get(key)
            .map(|e| e.value().clone())
            .ok_or_else(|| LookupError::NotFound {
                key: key.to_string(),
            })
    }

    async fn put(&self, key: &ParamKey, value: &str) -> Result<u64, LookupError> {
        let mut entry = self
            .params
            .entry(key.clone())
            .or_insert_with(|| Parameter {
                key: key.clone(),
                value: String::new(),
                version: 0,
                modified_at: Utc::now(),
            });
        let param = entry.value_mut();
        param.value = value.to_string();
        param.version += 1;
        param.modified_at = Utc::now();
        Ok(param.version)
    }
}
