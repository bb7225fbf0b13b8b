//! Parameter store inspection and seeding.

use tabled::{Table, Tabled};

use crate::cli::output;
use crate::cli::{ConfigPathArg, ParamsCommand};
use crate::config::Config;
use crate::domain::{keys, ParamKey};
use crate::error::{LookupError, Result};
use crate::store::{self, ParameterStore};
use crate::unit::PUBLIC_HANDLERS;

#[derive(Tabled)]
struct ParamRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Version")]
    version: String,
}

pub async fn execute(command: ParamsCommand) -> Result<()> {
    match command {
        ParamsCommand::List(args) => {
            let store = open(&args)?;
            list(store.as_ref()).await
        }
        ParamsCommand::Get { key, config } => {
            let store = open(&config)?;
            get(store.as_ref(), &key).await
        }
        ParamsCommand::Put { key, value, config } => {
            let store = open(&config)?;
            put(store.as_ref(), &key, &value).await
        }
    }
}

fn open(args: &ConfigPathArg) -> Result<std::sync::Arc<dyn ParameterStore>> {
    let config = Config::load(&args.config)?;
    config.init_logging();
    store::from_config(&config.store)
}

/// The store has no enumeration; list resolves each well-known key.
fn well_known_keys() -> Vec<ParamKey> {
    let mut all = vec![
        keys::model_artifact_bucket(),
        keys::execution_role_arn(),
        keys::model_version(),
        keys::endpoint_name(),
        keys::db_cluster_arn(),
        keys::db_secret_arn(),
        keys::api_url(),
        keys::distribution_id(),
        keys::frontend_bucket(),
    ];
    for handler in PUBLIC_HANDLERS {
        all.push(keys::handler_entry_point(handler));
    }
    all
}

async fn list(store: &dyn ParameterStore) -> Result<()> {
    let mut rows = Vec::new();
    for key in well_known_keys() {
        match store.get(&key).await {
            Ok(param) => rows.push(ParamRow {
                key: key.to_string(),
                value: param.value,
                version: param.version.to_string(),
            }),
            Err(LookupError::NotFound { .. }) => rows.push(ParamRow {
                key: key.to_string(),
                value: "(unset)".into(),
                version: "-".into(),
            }),
            Err(err) => return Err(err.into()),
        }
    }

    output::section("Well-known parameters");
    let table = Table::new(rows).to_string();
    for line in table.lines() {
        println!("  {line}");
    }
    Ok(())
}

async fn get(store: &dyn ParameterStore, key: &str) -> Result<()> {
    let param = store.get(&ParamKey::new(key)).await?;
    output::key_value("key", &param.key);
    output::key_value("value", &param.value);
    output::key_value("version", param.version);
    output::key_value("modified", param.modified_at.to_rfc3339());
    Ok(())
}

async fn put(store: &dyn ParameterStore, key: &str, value: &str) -> Result<()> {
    let version = store.put(&ParamKey::new(key), value).await?;
    output::ok(&format!("{key} = {value} (version {version})"));
    Ok(())
}
