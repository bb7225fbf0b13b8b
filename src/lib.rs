//! Mlstack - deployment orchestration and runtime handlers for a
//! hosted-model inference demo.
//!
//! The system is a set of independently deployable units (foundation,
//! hosting, backend, edge) that discover each other's identifiers through a
//! shared parameter store, plus the stateless request handlers that serve
//! runtime traffic against the provisioned endpoint.
//!
//! # Architecture
//!
//! - **`domain`** - Parameter namespace and the declarative resource graph
//! - **`store`** - Parameter store accessors (memory, HTTP) and bounded
//!   retry for cold-start and deploy-time lookups
//! - **`unit`** - The deployment units and their explicit predecessor,
//!   read, and write declarations
//! - **`app`** - The orchestrator: ordering validation and topological
//!   materialization through a provisioning engine
//! - **`provision`** - Provisioning engine seam plus the built-in local
//!   engine
//! - **`adapter`** - Outbound clients (hosted-model invocation, data API)
//! - **`runtime`** - Request handlers: `/generate`, `/ping`, `/vote`, and
//!   the one-shot database init
//!
//! # Example
//!
//! ```no_run
//! use mlstack::app::Orchestrator;
//! use mlstack::config::Config;
//! use mlstack::provision::LocalEngine;
//! use mlstack::store::{MemoryStore, RetryPolicy};
//!
//! # async fn demo() -> mlstack::error::Result<()> {
//! let config = Config::default();
//! let store = MemoryStore::new();
//! let engine = LocalEngine::new();
//!
//! let orchestrator = Orchestrator::from_config(&config);
//! let report = orchestrator
//!     .deploy(&store, &engine, RetryPolicy::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod provision;
pub mod runtime;
pub mod store;
pub mod unit;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
