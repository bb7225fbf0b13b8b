//! Configuration diagnostics.

use std::path::Path;

use crate::cli::output;
use crate::config::{Config, StoreBackend};
use crate::error::Result;

/// Validate the configuration file without deploying anything.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    println!("Checking configuration: {}", path.display());
    println!();

    let config = Config::load(path)?;

    output::ok("Configuration file is valid");
    output::section("Summary");
    output::key_value("Store", format!("{:?}", config.store.backend));
    output::key_value(
        "Retry",
        format!(
            "{} attempts, {:?} between",
            config.retry.attempts, config.retry.delay
        ),
    );
    output::key_value("Endpoint", &config.hosting.endpoint_name);
    output::key_value("Model", &config.hosting.model_name);
    output::key_value("Database", &config.backend.database);
    output::key_value(
        "Edge",
        if config.edge.enabled {
            format!("{} ({:?})", config.edge.domain, config.edge.posture)
        } else {
            "disabled".to_string()
        },
    );
    println!();

    if config.store.backend == StoreBackend::Memory {
        output::warn("Memory store: published parameters will not survive the process");
    }
    match &config.hosting.alarm_email {
        Some(email) if email.contains('@') => {
            output::ok("Endpoint error alarm will notify the configured address");
        }
        Some(_) => output::warn("alarm_email is not a valid address; the alarm will be skipped"),
        None => output::note("  Endpoint error alarm: disabled (no alarm_email)"),
    }

    println!();
    println!("Configuration is ready to use.");
    Ok(())
}
