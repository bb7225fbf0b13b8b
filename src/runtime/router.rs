//! Tagged route dispatch for the public HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::event::{Cors, HttpRequest, HttpResponse};
use super::{GenerateHandler, PingHandler, VoteHandler};
use crate::adapter::InferenceClient;
use crate::config::Config;
use crate::error::HandlerError;
use crate::store::{ParameterStore, RetryPolicy};

/// Public routes, decoded from the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Generate,
    Ping,
    Vote,
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/generate" => Some(Route::Generate),
            "/ping" => Some(Route::Ping),
            "/vote" | "/flag" => Some(Route::Vote),
            _ => None,
        }
    }
}

/// One warm handler per route, built once per execution environment.
pub struct Router {
    generate: GenerateHandler,
    ping: PingHandler,
    vote: VoteHandler,
    cors: Cors,
}

impl Router {
    /// Cold-start every routed handler. Any exhausted lookup fails the whole
    /// environment closed.
    pub async fn initialize(
        config: &Config,
        store: &dyn ParameterStore,
        inference: Arc<dyn InferenceClient>,
    ) -> Result<Self, HandlerError> {
        let cors = Cors::from_origins(&config.edge.cors_origins);
        let retry: RetryPolicy = config.retry;

        let generate = GenerateHandler::initialize(
            store,
            inference.clone(),
            retry,
            Duration::from_secs(config.backend.generate_timeout_secs),
            cors.clone(),
        )
        .await?;

        let ping = PingHandler::initialize(
            store,
            inference,
            retry,
            Duration::from_secs(config.backend.ping_timeout_secs),
            cors.clone(),
        )
        .await?;

        let vote = VoteHandler::new(cors.clone());

        Ok(Self {
            generate,
            ping,
            vote,
            cors,
        })
    }

    pub async fn dispatch(&self, request: &HttpRequest) -> HttpResponse {
        match Route::parse(&request.path) {
            Some(Route::Generate) => self.generate.handle(request).await,
            Some(Route::Ping) => self.ping.handle(request).await,
            Some(Route::Vote) => self.vote.handle(request).await,
            None => HttpResponse::json(
                404,
                &json!({ "error": format!("No route for {}", request.path) }),
                &self.cors,
            ),
        }
    }
}
