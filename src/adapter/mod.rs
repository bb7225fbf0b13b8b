//! Outbound clients for the external services handlers proxy to.

mod dataapi;
mod inference;

pub use dataapi::{DataApi, DbTarget, HttpDataApi};
pub use inference::{HttpInferenceClient, InferenceClient};
