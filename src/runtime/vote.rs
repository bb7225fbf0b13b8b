//! `/vote` handler: acknowledge feedback.
//!
//! No field is declared required: an absent `vote` is acknowledged with a
//! null marker rather than rejected. The only client error is an unreadable
//! body.

use serde_json::{json, Value};
use tracing::info;

use super::event::{Cors, HttpRequest, HttpResponse, Method};

pub struct VoteHandler {
    cors: Cors,
}

impl VoteHandler {
    /// No identifiers to resolve; this handler is warm from construction.
    pub fn new(cors: Cors) -> Self {
        Self { cors }
    }

    pub async fn handle(&self, request: &HttpRequest) -> HttpResponse {
        if request.method == Method::Options {
            return HttpResponse::preflight(&self.cors);
        }

        let body = request.body.as_deref().unwrap_or("{}");
        let parsed: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(err) => {
                return HttpResponse::json(
                    400,
                    &json!({ "error": "Invalid input format", "details": err.to_string() }),
                    &self.cors,
                )
            }
        };

        let vote = parsed.get("vote").cloned().unwrap_or(Value::Null);
        let rendered = match &vote {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        info!(vote = %rendered, "Vote received");

        HttpResponse::json(
            200,
            &json!({ "message": format!("Vote received: {rendered}") }),
            &self.cors,
        )
    }
}
