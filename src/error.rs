use std::time::Duration;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Deployment ordering and resource graph errors.
///
/// All of these are detected during plan validation or synthesis, before the
/// provisioning engine materializes anything.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("dependency cycle between deployment units: {path}")]
    DependencyCycle { path: String },

    #[error("unit '{unit}' declares unknown predecessor '{predecessor}'")]
    UnknownPredecessor { unit: String, predecessor: String },

    #[error("unit '{unit}' reads '{key}' but no declared predecessor writes it")]
    UndeclaredDependency { unit: String, key: String },

    #[error("parameter '{key}' is written by both '{first}' and '{second}'")]
    DuplicateWriter {
        key: String,
        first: String,
        second: String,
    },

    #[error("duplicate logical id in resource graph: {id}")]
    DuplicateLogicalId { id: String },

    #[error("resource '{id}' depends on undeclared resource '{missing}'")]
    UnresolvedReference { id: String, missing: String },

    #[error("unit '{unit}' was synthesized without required input '{key}'")]
    MissingInput { unit: String, key: String },

    #[error("no physical identifier recorded for '{id}' in unit '{unit}'")]
    NotMaterialized { unit: String, id: String },
}

/// Parameter store lookup errors.
#[derive(Error, Debug, Clone)]
pub enum LookupError {
    #[error("parameter not found: {key}")]
    NotFound { key: String },

    #[error("transient lookup failure for {key}: {reason}")]
    Transient { key: String, reason: String },

    #[error("lookup for {key} exhausted after {attempts} attempts: {last}")]
    Exhausted {
        key: String,
        attempts: u32,
        last: String,
    },
}

/// Request handler failures, each mapped to one response class.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Required identifier missing at cold start. Fatal to the instance; 500.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed or missing request field; 400.
    #[error("{0}")]
    Validation(String),

    /// External call failed; 502. Never retried within a request.
    #[error("{0}")]
    Upstream(String),

    /// External call exceeded its budget; 502.
    #[error("external call timed out after {budget:?}")]
    Timeout { budget: Duration },
}

impl HandlerError {
    /// HTTP status class for this failure.
    pub fn status(&self) -> u16 {
        match self {
            HandlerError::Configuration(_) => 500,
            HandlerError::Validation(_) => 400,
            HandlerError::Upstream(_) | HandlerError::Timeout { .. } => 502,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Synth(#[from] SynthError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
