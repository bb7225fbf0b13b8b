//! Plan validation and dry-run synthesis.

use tabled::{Table, Tabled};

use crate::app::Orchestrator;
use crate::cli::output;
use crate::config::Config;
use crate::error::Result;
use crate::provision::LocalEngine;
use crate::store::MemoryStore;

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Logical ID")]
    logical_id: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Depends On")]
    depends_on: String,
}

/// Validate ordering and print the full deployment plan.
///
/// Synthesis runs as a dry deployment against a throwaway in-memory store
/// and the local engine, so every resource graph is produced exactly as a
/// real deploy would, without touching the configured store.
pub async fn execute(config: &Config) -> Result<()> {
    let orchestrator = Orchestrator::from_config(config);
    let plan = orchestrator.plan()?;

    output::section("Deployment order");
    for (position, unit) in plan.order.iter().enumerate() {
        let predecessors = if unit.depends_on.is_empty() {
            "(none)".to_string()
        } else {
            unit.depends_on.join(", ")
        };
        println!("  {}. {:<12} after: {predecessors}", position + 1, unit.name);
    }

    let store = MemoryStore::new();
    let engine = LocalEngine::new();
    let report = orchestrator.deploy(&store, &engine, config.retry).await?;

    for unit in &report.units {
        output::section(&format!("Unit: {}", unit.name));

        let rows: Vec<ResourceRow> = unit
            .graph
            .iter()
            .map(|resource| ResourceRow {
                logical_id: resource.logical_id.to_string(),
                kind: resource.kind.to_string(),
                depends_on: resource
                    .depends_on
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        let table = Table::new(rows).to_string();
        for line in table.lines() {
            println!("  {line}");
        }

        if !unit.published.is_empty() {
            println!();
            for param in &unit.published {
                output::key_value("publishes", param.key.as_str());
            }
        }
    }

    println!();
    output::ok(&format!(
        "{} unit(s) synthesized without errors",
        report.units.len()
    ));
    Ok(())
}
