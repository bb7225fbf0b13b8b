//! Deployment units.
//!
//! A unit is an independently deployable group of declared resources plus
//! explicit predecessor declarations. Units never reference each other's
//! objects directly; identifiers cross unit boundaries only through the
//! parameter store, and a unit that reads a key must declare the writer as a
//! predecessor or the orchestrator refuses the plan.

mod backend;
mod edge;
mod foundation;
mod hosting;

pub use backend::{BackendUnit, PUBLIC_HANDLERS};
pub use edge::EdgeUnit;
pub use foundation::FoundationUnit;
pub use hosting::HostingUnit;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{LogicalId, ParamKey, ResourceGraph};
use crate::error::{Result, SynthError};
use crate::store::ParameterStore;

/// Parameter values resolved for a unit before synthesis.
#[derive(Debug, Default)]
pub struct SynthInputs {
    unit: String,
    values: HashMap<ParamKey, String>,
}

impl SynthInputs {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            values: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: ParamKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Fetch a resolved input value; missing inputs are a synthesis bug.
    pub fn get(&self, key: &ParamKey) -> std::result::Result<&str, SynthError> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| SynthError::MissingInput {
                unit: self.unit.clone(),
                key: key.to_string(),
            })
    }
}

/// Physical identifiers assigned by the provisioning engine for one unit.
#[derive(Debug, Clone)]
pub struct Materialized {
    unit: String,
    physical: HashMap<LogicalId, String>,
}

impl Materialized {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            physical: HashMap::new(),
        }
    }

    pub fn record(&mut self, id: LogicalId, physical: impl Into<String>) {
        self.physical.insert(id, physical.into());
    }

    pub fn physical(&self, id: &LogicalId) -> std::result::Result<&str, SynthError> {
        self.physical
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| SynthError::NotMaterialized {
                unit: self.unit.clone(),
                id: id.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.physical.is_empty()
    }
}

/// An independently deployable group of declared resources.
#[async_trait]
pub trait DeploymentUnit: Send + Sync {
    /// Unique identifier for this unit. Used in ordering and logging.
    fn name(&self) -> &'static str;

    /// Explicit predecessor units.
    fn depends_on(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Parameter keys this unit resolves before synthesis.
    fn reads(&self) -> Vec<ParamKey> {
        Vec::new()
    }

    /// Parameter keys this unit publishes after materialization.
    fn writes(&self) -> Vec<ParamKey> {
        Vec::new()
    }

    /// Declare this unit's resource graph. Pure: no provisioning, no store
    /// access; all reads arrive pre-resolved in `inputs`.
    fn synthesize(&self, inputs: &SynthInputs) -> Result<ResourceGraph>;

    /// Publish declared outputs after the unit's resources are live.
    async fn publish(
        &self,
        materialized: &Materialized,
        store: &dyn ParameterStore,
    ) -> Result<()>;
}
