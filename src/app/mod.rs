//! Application layer: deployment orchestration over the configured units.

mod orchestrator;

pub use orchestrator::{DeployPlan, DeployReport, Orchestrator, UnitReport, UnitSummary};
