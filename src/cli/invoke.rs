//! Local handler invocation against the configured store and services.

use std::sync::Arc;

use crate::adapter::{HttpDataApi, HttpInferenceClient};
use crate::cli::{output, InvokeArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::runtime::{DbInitHandler, DbInitOutcome, HttpRequest, Method, Router};
use crate::store;

/// Run one handler the way the external dispatcher would.
pub async fn execute(config: &Config, args: &InvokeArgs) -> Result<()> {
    let store = store::from_config(&config.store)?;

    if args.route == "db-init" {
        return db_init(config, store.as_ref()).await;
    }

    let path = format!("/{}", args.route.trim_start_matches('/'));
    let method = match &args.method {
        Some(raw) => raw.parse::<Method>().map_err(Error::InvalidArgument)?,
        None if args.route == "ping" => Method::Get,
        None => Method::Post,
    };

    let inference = Arc::new(HttpInferenceClient::new(&config.backend.invocation_url));
    let router = Router::initialize(config, store.as_ref(), inference).await?;

    let request = HttpRequest {
        method,
        path,
        body: args.body.clone(),
    };

    let response = router.dispatch(&request).await;

    output::key_value("status", response.status);
    for (name, value) in &response.headers {
        output::key_value(name, value);
    }
    println!();
    println!("{}", response.body);

    if response.status >= 500 {
        output::error("Handler reported a server-side failure");
    }
    Ok(())
}

async fn db_init(config: &Config, store: &dyn crate::store::ParameterStore) -> Result<()> {
    let data_api = Arc::new(HttpDataApi::new(&config.backend.data_api_url));
    let handler = DbInitHandler::initialize(
        store,
        data_api,
        config.retry,
        config.backend.database.clone(),
    )
    .await?;

    match handler.run().await {
        DbInitOutcome::Success { message } => {
            output::ok(&message);
            Ok(())
        }
        DbInitOutcome::Failed { reason } => {
            output::error(&reason);
            Err(Error::InvalidArgument(format!(
                "database initialization failed: {reason}"
            )))
        }
    }
}
