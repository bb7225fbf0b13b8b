//! Provisioning engine seam.
//!
//! The orchestrator emits resource graphs; realizing them is delegated to an
//! engine behind this trait. The built-in [`LocalEngine`] realizes graphs in
//! memory with deterministic unique physical names, which is enough for the
//! local deploy workflow and for tests. Real cloud engines are external
//! collaborators.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{LogicalId, ResourceGraph, ResourceKind};
use crate::error::Result;
use crate::unit::Materialized;

/// Realizes a unit's declared resource graph.
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Materialize every resource in the graph, returning the physical
    /// identifier assigned to each logical id. Returns only once the
    /// resources are live (an endpoint is serving, not merely declared).
    async fn materialize(&self, unit: &str, graph: &ResourceGraph) -> Result<Materialized>;
}

/// Record of one realized resource.
#[derive(Debug, Clone)]
pub struct RealizedResource {
    pub unit: String,
    pub logical_id: LogicalId,
    pub kind: ResourceKind,
    pub physical: String,
}

/// In-memory engine for local deployments and tests.
#[derive(Debug, Default)]
pub struct LocalEngine {
    realized: RwLock<Vec<RealizedResource>>,
}

impl LocalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// All resources realized so far, in materialization order.
    pub fn realized(&self) -> Vec<RealizedResource> {
        self.realized.read().clone()
    }

    fn physical_name(unit: &str, id: &LogicalId) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{unit}-{id}-{}", &suffix[..8])
    }
}

#[async_trait]
impl ProvisioningEngine for LocalEngine {
    async fn materialize(&self, unit: &str, graph: &ResourceGraph) -> Result<Materialized> {
        graph.validate()?;

        let mut materialized = Materialized::new(unit);
        let mut realized = self.realized.write();

        // Insertion order respects intra-unit dependencies (validated above),
        // so a single pass realizes predecessors first.
        for resource in graph.iter() {
            let physical = resource
                .requested_name()
                .map(str::to_string)
                .unwrap_or_else(|| Self::physical_name(unit, &resource.logical_id));

            debug!(
                unit,
                logical = %resource.logical_id,
                kind = %resource.kind,
                physical = %physical,
                "Resource realized"
            );

            realized.push(RealizedResource {
                unit: unit.to_string(),
                logical_id: resource.logical_id.clone(),
                kind: resource.kind,
                physical: physical.clone(),
            });
            materialized.record(resource.logical_id.clone(), physical);
        }

        info!(unit, resources = graph.len(), "Unit materialized");
        Ok(materialized)
    }
}
