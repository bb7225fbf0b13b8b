//! Core domain types: the shared parameter namespace and the declarative
//! resource graph that deployment units emit.

mod param;
mod resource;

pub use param::{keys, ParamKey, Parameter};
pub use resource::{LogicalId, Resource, ResourceGraph, ResourceKind};
