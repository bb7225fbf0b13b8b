//! Full deployment against the configured store.

use tabled::{Table, Tabled};

use crate::app::Orchestrator;
use crate::cli::output;
use crate::config::Config;
use crate::error::Result;
use crate::provision::LocalEngine;
use crate::store;

#[derive(Tabled)]
struct PublishedRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Version")]
    version: u64,
}

/// Materialize every unit and print what each one published.
pub async fn execute(config: &Config) -> Result<()> {
    let store = store::from_config(&config.store)?;
    let engine = LocalEngine::new();
    let orchestrator = Orchestrator::from_config(config);

    let report = orchestrator
        .deploy(store.as_ref(), &engine, config.retry)
        .await?;

    for unit in &report.units {
        output::section(&format!("Unit: {}", unit.name));
        output::key_value("resources", unit.graph.len());

        if unit.published.is_empty() {
            output::note("  (publishes nothing)");
            continue;
        }

        let rows: Vec<PublishedRow> = unit
            .published
            .iter()
            .map(|param| PublishedRow {
                key: param.key.to_string(),
                value: param.value.clone(),
                version: param.version,
            })
            .collect();

        let table = Table::new(rows).to_string();
        for line in table.lines() {
            println!("  {line}");
        }
    }

    println!();
    output::ok(&format!("Deployed {} unit(s)", report.units.len()));
    Ok(())
}
