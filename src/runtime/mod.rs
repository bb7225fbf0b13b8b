//! Runtime request handlers.
//!
//! Each handler is stateless per invocation: identifiers are resolved once
//! at cold start (bounded retry, fail closed) into the handler's own context,
//! then every request performs at most one external call within its timeout
//! budget. Handlers hold no mutable state after initialization, so many
//! instances may run concurrently.

mod db_init;
mod event;
mod generate;
mod ping;
mod router;
mod vote;

pub use db_init::{DbInitHandler, DbInitOutcome};
pub use event::{Cors, HttpRequest, HttpResponse, Method};
pub use generate::GenerateHandler;
pub use ping::{PingHandler, PROBE_PAYLOAD};
pub use router::{Route, Router};
pub use vote::VoteHandler;
