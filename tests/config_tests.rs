use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use mlstack::config::{AccessPosture, Config, StoreBackend};
use mlstack::error::{ConfigError, Error};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("mlstack-config-test-{nanos}-{suffix}.toml"));
    fs::write(&path, contents).expect("write temp config");
    path
}

fn load(contents: &str) -> Result<Config, Error> {
    let path = write_temp_config(contents);
    let result = Config::load(&path);
    let _ = fs::remove_file(&path);
    result
}

#[test]
fn empty_config_loads_with_defaults() {
    let config = load("").expect("defaults are valid");

    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.retry.attempts, 3);
    assert_eq!(config.retry.delay.as_secs(), 1);
    assert_eq!(config.hosting.endpoint_name, "gpt2-endpoint");
    assert_eq!(config.hosting.model_name, "gpt2-model");
    assert_eq!(config.backend.database, "mlpipeline");
    assert_eq!(config.backend.generate_timeout_secs, 30);
    assert_eq!(config.backend.vote_timeout_secs, 5);
    assert!(config.edge.enabled);
    assert_eq!(config.edge.posture, AccessPosture::DistributionOnly);
}

#[test]
fn partial_retry_table_fills_the_missing_field() {
    let config = load("[retry]\nattempts = 5\n").expect("partial retry table is valid");
    assert_eq!(config.retry.attempts, 5);
    assert_eq!(config.retry.delay.as_secs(), 1);

    let config = load("[retry]\ndelay = 4\n").expect("partial retry table is valid");
    assert_eq!(config.retry.attempts, 3);
    assert_eq!(config.retry.delay.as_secs(), 4);
}

#[test]
fn config_rejects_zero_retry_attempts() {
    let toml = r#"
[retry]
attempts = 0
delay = 1
"#;

    match load(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "retry.attempts",
            ..
        })) => {}
        Err(err) => panic!("expected retry.attempts error, got {err}"),
        Ok(_) => panic!("expected zero attempts to be rejected"),
    }
}

#[test]
fn config_rejects_empty_endpoint_name() {
    let toml = r#"
[hosting]
endpoint_name = ""
"#;

    match load(toml) {
        Err(Error::Config(ConfigError::MissingField {
            field: "hosting.endpoint_name",
        })) => {}
        Err(err) => panic!("expected endpoint name error, got {err}"),
        Ok(_) => panic!("expected empty endpoint name to be rejected"),
    }
}

#[test]
fn config_rejects_zero_timeout_budgets() {
    let toml = r#"
[backend]
generate_timeout_secs = 0
"#;

    assert!(matches!(
        load(toml),
        Err(Error::Config(ConfigError::InvalidValue { .. }))
    ));
}

#[test]
fn enabled_edge_requires_a_domain() {
    let toml = r#"
[edge]
enabled = true
domain = ""
"#;

    match load(toml) {
        Err(Error::Config(ConfigError::MissingField {
            field: "edge.domain",
        })) => {}
        Err(err) => panic!("expected edge.domain error, got {err}"),
        Ok(_) => panic!("expected enabled edge without domain to be rejected"),
    }
}

#[test]
fn disabled_edge_does_not_require_a_domain() {
    let toml = r#"
[edge]
enabled = false
domain = ""
"#;

    let config = load(toml).expect("disabled edge needs no domain");
    assert!(!config.edge.enabled);
}

#[test]
fn http_store_requires_a_url() {
    let toml = r#"
[store]
backend = "http"
"#;

    match load(toml) {
        Err(Error::Config(ConfigError::MissingField { field: "store.url" })) => {}
        Err(err) => panic!("expected store.url error, got {err}"),
        Ok(_) => panic!("expected http store without url to be rejected"),
    }
}

#[test]
fn capacity_modes_parse_from_tagged_tables() {
    let toml = r#"
[hosting.capacity]
type = "serverless"
memory_mb = 3072
max_concurrency = 10
"#;

    let config = load(toml).expect("serverless capacity is valid");
    match config.hosting.capacity {
        mlstack::config::CapacityConfig::Serverless {
            memory_mb,
            max_concurrency,
        } => {
            assert_eq!(memory_mb, 3072);
            assert_eq!(max_concurrency, 10);
        }
        other => panic!("expected serverless capacity, got {other:?}"),
    }
}

#[test]
fn posture_parses_from_kebab_case() {
    let toml = r#"
[edge]
posture = "public-read"
"#;

    let config = load(toml).expect("posture parses");
    assert_eq!(config.edge.posture, AccessPosture::PublicRead);
}

#[test]
fn unreadable_file_is_a_read_error() {
    let mut path = std::env::temp_dir();
    path.push("mlstack-config-test-definitely-missing.toml");

    match Config::load(&path) {
        Err(Error::Config(ConfigError::ReadFile(_))) => {}
        other => panic!("expected read error, got {other:?}"),
    }
}
