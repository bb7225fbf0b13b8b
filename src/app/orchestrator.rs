//! Deployment orchestration.
//!
//! The orchestrator owns the full set of deployment units and the explicit
//! partial order between them. Ordering is validated up front: a unit is
//! never handed to the provisioning engine before every identifier it reads
//! has a writer among its transitive predecessors, and a cyclic dependency
//! is a fatal configuration error detected before any resource materializes.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::config::Config;
use crate::domain::{Parameter, ResourceGraph};
use crate::error::{Result, SynthError};
use crate::provision::ProvisioningEngine;
use crate::store::{get_with_retry, ParameterStore, RetryPolicy};
use crate::unit::{
    BackendUnit, DeploymentUnit, EdgeUnit, FoundationUnit, HostingUnit, SynthInputs,
};

/// Validated deployment ordering.
#[derive(Debug)]
pub struct DeployPlan {
    pub order: Vec<UnitSummary>,
    pub edges: Vec<(String, String)>,
}

/// Declared shape of one unit, for plan display.
#[derive(Debug)]
pub struct UnitSummary {
    pub name: String,
    pub depends_on: Vec<String>,
    pub reads: Vec<String>,
    pub writes: Vec<String>,
}

/// Outcome of materializing one unit.
pub struct UnitReport {
    pub name: String,
    pub graph: ResourceGraph,
    pub published: Vec<Parameter>,
}

/// Outcome of a full deployment.
pub struct DeployReport {
    pub units: Vec<UnitReport>,
}

pub struct Orchestrator {
    units: Vec<Box<dyn DeploymentUnit>>,
}

impl Orchestrator {
    /// Compose the standard units in their fixed order.
    pub fn from_config(config: &Config) -> Self {
        let mut units: Vec<Box<dyn DeploymentUnit>> = vec![
            Box::new(FoundationUnit::new(config.foundation.clone())),
            Box::new(HostingUnit::new(
                config.hosting.clone(),
                config.foundation.artifact_prefix.clone(),
            )),
            Box::new(BackendUnit::new(config.backend.clone())),
        ];
        if config.edge.enabled {
            units.push(Box::new(EdgeUnit::new(config.edge.clone())));
        }
        Self { units }
    }

    /// Compose from an explicit unit set (used by tests and extensions).
    pub fn with_units(units: Vec<Box<dyn DeploymentUnit>>) -> Self {
        Self { units }
    }

    /// Validate ordering constraints and produce the materialization order.
    pub fn plan(&self) -> Result<DeployPlan> {
        let names: Vec<&str> = self.units.iter().map(|u| u.name()).collect();
        let index: HashMap<&str, usize> = names.iter().enumerate().map(|(i, n)| (*n, i)).collect();

        // Unknown predecessors are fatal before any ordering work.
        for unit in &self.units {
            for pred in unit.depends_on() {
                if !index.contains_key(pred) {
                    return Err(SynthError::UnknownPredecessor {
                        unit: unit.name().to_string(),
                        predecessor: pred.to_string(),
                    }
                    .into());
                }
            }
        }

        // Each key has exactly one writer.
        let mut writers: HashMap<String, &str> = HashMap::new();
        for unit in &self.units {
            for key in unit.writes() {
                if let Some(first) = writers.insert(key.to_string(), unit.name()) {
                    if first != unit.name() {
                        return Err(SynthError::DuplicateWriter {
                            key: key.to_string(),
                            first: first.to_string(),
                            second: unit.name().to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        let order = self.topological_order(&index)?;

        // Every read must be covered by a transitive predecessor's write.
        for unit in &self.units {
            let preds = self.transitive_predecessors(unit.name(), &index);
            for key in unit.reads() {
                match writers.get(key.as_str()) {
                    Some(writer) if preds.contains(writer) => {}
                    _ => {
                        return Err(SynthError::UndeclaredDependency {
                            unit: unit.name().to_string(),
                            key: key.to_string(),
                        }
                        .into())
                    }
                }
            }
        }

        let mut edges = Vec::new();
        for unit in &self.units {
            for pred in unit.depends_on() {
                edges.push((pred.to_string(), unit.name().to_string()));
            }
        }

        let summaries = order
            .iter()
            .map(|&i| {
                let unit = &self.units[i];
                UnitSummary {
                    name: unit.name().to_string(),
                    depends_on: unit.depends_on().iter().map(|s| s.to_string()).collect(),
                    reads: unit.reads().iter().map(|k| k.to_string()).collect(),
                    writes: unit.writes().iter().map(|k| k.to_string()).collect(),
                }
            })
            .collect();

        Ok(DeployPlan {
            order: summaries,
            edges,
        })
    }

    /// Materialize every unit in dependency order.
    ///
    /// For each unit: resolve declared reads (bounded retry), synthesize,
    /// hand the graph to the engine, then let the unit publish its outputs.
    pub async fn deploy(
        &self,
        store: &dyn ParameterStore,
        engine: &dyn ProvisioningEngine,
        retry: RetryPolicy,
    ) -> Result<DeployReport> {
        let plan = self.plan()?;
        let by_name: HashMap<&str, &Box<dyn DeploymentUnit>> =
            self.units.iter().map(|u| (u.name(), u)).collect();

        let mut reports = Vec::new();

        for summary in &plan.order {
            let unit = by_name[summary.name.as_str()];
            info!(unit = %summary.name, "Materializing unit");

            let mut inputs = SynthInputs::new(unit.name());
            for key in unit.reads() {
                let param = get_with_retry(store, &key, retry).await?;
                inputs.insert(key, param.value);
            }

            let graph = unit.synthesize(&inputs)?;
            let materialized = engine.materialize(unit.name(), &graph).await?;
            unit.publish(&materialized, store).await?;

            let mut published = Vec::new();
            for key in unit.writes() {
                published.push(store.get(&key).await.map_err(crate::error::Error::from)?);
            }

            info!(
                unit = %summary.name,
                resources = graph.len(),
                published = published.len(),
                "Unit deployed"
            );
            reports.push(UnitReport {
                name: summary.name.clone(),
                graph,
                published,
            });
        }

        Ok(DeployReport { units: reports })
    }

    fn topological_order(&self, index: &HashMap<&str, usize>) -> Result<Vec<usize>> {
        let n = self.units.len();
        let mut indegree = vec![0usize; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, unit) in self.units.iter().enumerate() {
            for pred in unit.depends_on() {
                let p = index[pred];
                successors[p].push(i);
                indegree[i] += 1;
            }
        }

        // Kahn's algorithm, preserving declaration order among ready units.
        let mut ready: Vec<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(&i) = ready.first() {
            ready.remove(0);
            order.push(i);
            for &succ in &successors[i] {
                indegree[succ] -= 1;
                if indegree[succ] == 0 {
                    ready.push(succ);
                }
            }
        }

        if order.len() < n {
            let stuck: Vec<&str> = (0..n)
                .filter(|i| !order.contains(i))
                .map(|i| self.units[i].name())
                .collect();
            return Err(SynthError::DependencyCycle {
                path: stuck.join(" -> "),
            }
            .into());
        }

        Ok(order)
    }

    fn transitive_predecessors(
        &self,
        name: &str,
        index: &HashMap<&str, usize>,
    ) -> HashSet<&str> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&str> = self.units[index[name]].depends_on();
        while let Some(pred) = stack.pop() {
            if seen.insert(pred) {
                stack.extend(self.units[index[pred]].depends_on());
            }
        }
        seen
    }
}
