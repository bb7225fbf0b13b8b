//! Request handler unit: database cluster plus one function per handler.
//!
//! Handlers receive the parameter keys they need through their environment;
//! the actual values are resolved at handler cold start, not baked in at
//! deploy time, so a hosting redeploy never forces a backend redeploy.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::{DeploymentUnit, Materialized, SynthInputs};
use crate::config::BackendConfig;
use crate::domain::{keys, LogicalId, ParamKey, Resource, ResourceGraph, ResourceKind};
use crate::error::Result;
use crate::store::ParameterStore;

const DB_CLUSTER: &str = "DbCluster";
const DB_SECRET: &str = "DbSecret";
const DB_INIT_FN: &str = "DbInitHandler";
const DB_INIT_TRIGGER: &str = "DbInitTrigger";
const GENERATE_FN: &str = "GenerateHandler";
const PING_FN: &str = "PingHandler";
const VOTE_FN: &str = "VoteHandler";

/// Handlers exposed through the public API, in route order.
pub const PUBLIC_HANDLERS: [&str; 3] = ["generate", "ping", "vote"];

pub struct BackendUnit {
    config: BackendConfig,
}

impl BackendUnit {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    fn function(
        &self,
        logical_id: &str,
        timeout_secs: u64,
        environment: serde_json::Value,
    ) -> Resource {
        Resource::new(
            logical_id,
            ResourceKind::Function,
            json!({
                "timeout_secs": timeout_secs,
                "environment": environment,
            }),
        )
    }
}

#[async_trait]
impl DeploymentUnit for BackendUnit {
    fn name(&self) -> &'static str {
        "backend"
    }

    fn depends_on(&self) -> Vec<&'static str> {
        vec!["hosting"]
    }

    fn reads(&self) -> Vec<ParamKey> {
        vec![keys::endpoint_name()]
    }

    fn writes(&self) -> Vec<ParamKey> {
        let mut written = vec![keys::db_cluster_arn(), keys::db_secret_arn()];
        written.extend(PUBLIC_HANDLERS.iter().map(|h| keys::handler_entry_point(h)));
        written
    }

    fn synthesize(&self, inputs: &SynthInputs) -> Result<ResourceGraph> {
        // The value is not wired into any declaration (handlers re-resolve it
        // at cold start), but a missing endpoint at synthesis would mean the
        // ordering contract was violated upstream.
        let _endpoint = inputs.get(&keys::endpoint_name())?;

        let mut graph = ResourceGraph::new();

        graph.push(Resource::new(
            DB_CLUSTER,
            ResourceKind::DbCluster,
            json!({
                "engine": "postgres-serverless",
                "database": self.config.database,
                "writers": 1,
                "readers": 1,
            }),
        ))?;

        graph.push(
            Resource::new(DB_SECRET, ResourceKind::DbSecret, json!({}))
                .depends_on(DB_CLUSTER),
        )?;

        let db_env = json!({
            "CLUSTER_ARN_PARAM": keys::db_cluster_arn().as_str(),
            "DB_SECRET_ARN_PARAM": keys::db_secret_arn().as_str(),
            "DB_NAME": self.config.database,
        });

        graph.push(
            self.function(DB_INIT_FN, 30, db_env.clone())
                .depends_on(DB_CLUSTER)
                .depends_on(DB_SECRET),
        )?;

        // One-shot init once the cluster and function exist.
        graph.push(
            Resource::new(
                DB_INIT_TRIGGER,
                ResourceKind::CustomTrigger,
                json!({ "service_token": DB_INIT_FN }),
            )
            .depends_on(DB_INIT_FN),
        )?;

        let mut generate_env = db_env;
        generate_env["ENDPOINT_NAME_PARAM"] = json!(keys::endpoint_name().as_str());

        graph.push(
            self.function(
                GENERATE_FN,
                self.config.generate_timeout_secs,
                generate_env,
            )
            .depends_on(DB_CLUSTER),
        )?;

        graph.push(self.function(
            PING_FN,
            self.config.ping_timeout_secs,
            json!({ "ENDPOINT_NAME_PARAM": keys::endpoint_name().as_str() }),
        ))?;

        graph.push(self.function(
            VOTE_FN,
            self.config.vote_timeout_secs,
            json!({}),
        ))?;

        graph.validate()?;
        Ok(graph)
    }

    async fn publish(
        &self,
        materialized: &Materialized,
        store: &dyn ParameterStore,
    ) -> Result<()> {
        let cluster = materialized.physical(&LogicalId::new(DB_CLUSTER))?;
        let secret = materialized.physical(&LogicalId::new(DB_SECRET))?;

        store.put(&keys::db_cluster_arn(), cluster).await?;
        store.put(&keys::db_secret_arn(), secret).await?;

        for (handler, logical) in [
            ("generate", GENERATE_FN),
            ("ping", PING_FN),
            ("vote", VOTE_FN),
        ] {
            let arn = materialized.physical(&LogicalId::new(logical))?;
            store.put(&keys::handler_entry_point(handler), arn).await?;
        }

        info!(cluster, secret, "Backend identifiers published");
        Ok(())
    }
}
