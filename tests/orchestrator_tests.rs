//! Orchestrator ordering validation: the plan is refused before anything
//! materializes when declarations are inconsistent.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use mlstack::app::Orchestrator;
use mlstack::config::Config;
use mlstack::domain::{keys, ParamKey, Parameter, Resource, ResourceGraph, ResourceKind};
use mlstack::error::{Error, LookupError, Result, SynthError};
use mlstack::provision::{LocalEngine, ProvisioningEngine};
use mlstack::store::{MemoryStore, ParameterStore, RetryPolicy};
use mlstack::unit::{DeploymentUnit, Materialized, SynthInputs};

/// Minimal configurable unit for exercising plan validation.
struct StubUnit {
    name: &'static str,
    depends_on: Vec<&'static str>,
    reads: Vec<ParamKey>,
    writes: Vec<ParamKey>,
}

impl StubUnit {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            depends_on: Vec::new(),
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    fn after(mut self, predecessor: &'static str) -> Self {
        self.depends_on.push(predecessor);
        self
    }

    fn reading(mut self, key: &str) -> Self {
        self.reads.push(ParamKey::new(key));
        self
    }

    fn writing(mut self, key: &str) -> Self {
        self.writes.push(ParamKey::new(key));
        self
    }
}

#[async_trait]
impl DeploymentUnit for StubUnit {
    fn name(&self) -> &'static str {
        self.name
    }

    fn depends_on(&self) -> Vec<&'static str> {
        self.depends_on.clone()
    }

    fn reads(&self) -> Vec<ParamKey> {
        self.reads.clone()
    }

    fn writes(&self) -> Vec<ParamKey> {
        self.writes.clone()
    }

    fn synthesize(&self, inputs: &SynthInputs) -> Result<ResourceGraph> {
        for key in &self.reads {
            inputs.get(key)?;
        }
        let mut graph = ResourceGraph::new();
        graph.push(Resource::new(
            "Marker",
            ResourceKind::Bucket,
            serde_json::json!({}),
        ))?;
        Ok(graph)
    }

    async fn publish(
        &self,
        _materialized: &Materialized,
        store: &dyn ParameterStore,
    ) -> Result<()> {
        for key in &self.writes {
            store.put(key, self.name).await.map_err(Error::from)?;
        }
        Ok(())
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        attempts: 1,
        delay: std::time::Duration::from_millis(1),
    }
}

#[test]
fn cyclic_predecessors_are_refused() {
    let orchestrator = Orchestrator::with_units(vec![
        Box::new(StubUnit::new("a").after("b")),
        Box::new(StubUnit::new("b").after("a")),
    ]);

    let err = orchestrator.plan().unwrap_err();
    match err {
        Error::Synth(SynthError::DependencyCycle { path }) => {
            assert!(path.contains("a") && path.contains("b"), "path: {path}");
        }
        other => panic!("expected cycle error, got {other}"),
    }
}

#[test]
fn unknown_predecessor_is_refused() {
    let orchestrator =
        Orchestrator::with_units(vec![Box::new(StubUnit::new("backend").after("hosting"))]);

    let err = orchestrator.plan().unwrap_err();
    assert!(matches!(
        err,
        Error::Synth(SynthError::UnknownPredecessor { .. })
    ));
}

#[test]
fn two_writers_of_one_key_are_refused() {
    let orchestrator = Orchestrator::with_units(vec![
        Box::new(StubUnit::new("a").writing("/k/shared")),
        Box::new(StubUnit::new("b").writing("/k/shared")),
    ]);

    let err = orchestrator.plan().unwrap_err();
    match err {
        Error::Synth(SynthError::DuplicateWriter { key, first, second }) => {
            assert_eq!(key, "/k/shared");
            assert_eq!((first.as_str(), second.as_str()), ("a", "b"));
        }
        other => panic!("expected duplicate writer error, got {other}"),
    }
}

#[test]
fn reading_without_a_predecessor_writer_is_refused() {
    // "b" reads a key "a" writes but never declares "a" as a predecessor.
    let orchestrator = Orchestrator::with_units(vec![
        Box::new(StubUnit::new("a").writing("/k/out")),
        Box::new(StubUnit::new("b").reading("/k/out")),
    ]);

    let err = orchestrator.plan().unwrap_err();
    match err {
        Error::Synth(SynthError::UndeclaredDependency { unit, key }) => {
            assert_eq!(unit, "b");
            assert_eq!(key, "/k/out");
        }
        other => panic!("expected undeclared dependency error, got {other}"),
    }
}

#[test]
fn transitive_predecessors_cover_reads() {
    // c reads a's output through the chain a <- b <- c.
    let orchestrator = Orchestrator::with_units(vec![
        Box::new(StubUnit::new("a").writing("/k/out")),
        Box::new(StubUnit::new("b").after("a")),
        Box::new(StubUnit::new("c").after("b").reading("/k/out")),
    ]);

    let plan = orchestrator.plan().unwrap();
    let order: Vec<&str> = plan.order.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn declaration_order_is_preserved_among_independent_units() {
    let orchestrator = Orchestrator::with_units(vec![
        Box::new(StubUnit::new("x")),
        Box::new(StubUnit::new("y")),
        Box::new(StubUnit::new("z").after("x")),
    ]);

    let plan = orchestrator.plan().unwrap();
    let order: Vec<&str> = plan.order.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(order, vec!["x", "y", "z"]);
}

#[tokio::test]
async fn deploy_resolves_reads_from_upstream_writes() {
    let orchestrator = Orchestrator::with_units(vec![
        Box::new(StubUnit::new("producer").writing("/k/handle")),
        Box::new(StubUnit::new("consumer").after("producer").reading("/k/handle")),
    ]);

    let store = MemoryStore::new();
    let engine = LocalEngine::new();
    let report = orchestrator
        .deploy(&store, &engine, fast_retry())
        .await
        .unwrap();

    assert_eq!(report.units.len(), 2);
    assert_eq!(report.units[0].published.len(), 1);
    assert_eq!(report.units[0].published[0].value, "producer");

    // Both unit graphs were realized by the engine.
    assert_eq!(engine.realized().len(), 2);
}

/// Shared event log appended to by the store and engine doubles below, so a
/// test can observe the relative order of materialization and publication.
type EventLog = Arc<Mutex<Vec<String>>>;

struct JournalingStore {
    inner: MemoryStore,
    events: EventLog,
}

#[async_trait]
impl ParameterStore for JournalingStore {
    async fn get(&self, key: &ParamKey) -> std::result::Result<Parameter, LookupError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &ParamKey, value: &str) -> std::result::Result<u64, LookupError> {
        self.events.lock().push(format!("put {key}"));
        self.inner.put(key, value).await
    }
}

struct JournalingEngine {
    inner: LocalEngine,
    events: EventLog,
}

#[async_trait]
impl ProvisioningEngine for JournalingEngine {
    async fn materialize(&self, unit: &str, graph: &ResourceGraph) -> Result<Materialized> {
        self.events.lock().push(format!("materialize {unit}"));
        self.inner.materialize(unit, graph).await
    }
}

#[tokio::test]
async fn units_materialize_before_they_publish() {
    let mut config = Config::default();
    config.retry = fast_retry();

    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let store = JournalingStore {
        inner: MemoryStore::new(),
        events: events.clone(),
    };
    let engine = JournalingEngine {
        inner: LocalEngine::new(),
        events: events.clone(),
    };

    Orchestrator::from_config(&config)
        .deploy(&store, &engine, config.retry)
        .await
        .unwrap();

    let log = events.lock();
    let position = |event: &str| {
        log.iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("missing event '{event}' in {log:?}"))
    };

    // The stable endpoint name only becomes visible once the engine has
    // realized the hosting graph, and likewise for the other units' outputs.
    assert!(position("materialize hosting") < position(&format!("put {}", keys::endpoint_name())));
    assert!(
        position("materialize foundation")
            < position(&format!("put {}", keys::model_artifact_bucket()))
    );
    assert!(
        position("materialize backend") < position(&format!("put {}", keys::db_cluster_arn()))
    );
    assert!(position("materialize edge") < position(&format!("put {}", keys::api_url())));

    // Downstream units only materialize after their predecessors published.
    assert!(position(&format!("put {}", keys::endpoint_name())) < position("materialize backend"));
}

#[tokio::test]
async fn deploy_of_an_invalid_plan_touches_nothing() {
    let orchestrator = Orchestrator::with_units(vec![
        Box::new(StubUnit::new("a").after("b")),
        Box::new(StubUnit::new("b").after("a")),
    ]);

    let store = MemoryStore::new();
    let engine = LocalEngine::new();
    let result = orchestrator.deploy(&store, &engine, fast_retry()).await;

    assert!(result.is_err());
    assert!(store.is_empty());
    assert!(engine.realized().is_empty());
}
