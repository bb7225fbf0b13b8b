//! Declarative resource graph emitted by deployment units.
//!
//! A unit's synthesis output is a flat, insertion-ordered set of resource
//! declarations with intra-unit dependency edges. The graph is handed to a
//! provisioning engine; nothing here performs provisioning itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SynthError;

/// Identifier of a resource within one unit's graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LogicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LogicalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LogicalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Recognized resource kinds across all units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Bucket,
    BucketPolicy,
    BucketDeployment,
    Role,
    Model,
    EndpointConfig,
    Endpoint,
    Alarm,
    NotificationTopic,
    Function,
    CustomTrigger,
    DbCluster,
    DbSecret,
    RestApi,
    Certificate,
    OriginAccessControl,
    Distribution,
    DnsRecord,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Bucket => "bucket",
            ResourceKind::BucketPolicy => "bucket-policy",
            ResourceKind::BucketDeployment => "bucket-deployment",
            ResourceKind::Role => "role",
            ResourceKind::Model => "model",
            ResourceKind::EndpointConfig => "endpoint-config",
            ResourceKind::Endpoint => "endpoint",
            ResourceKind::Alarm => "alarm",
            ResourceKind::NotificationTopic => "notification-topic",
            ResourceKind::Function => "function",
            ResourceKind::CustomTrigger => "custom-trigger",
            ResourceKind::DbCluster => "db-cluster",
            ResourceKind::DbSecret => "db-secret",
            ResourceKind::RestApi => "rest-api",
            ResourceKind::Certificate => "certificate",
            ResourceKind::OriginAccessControl => "origin-access-control",
            ResourceKind::Distribution => "distribution",
            ResourceKind::DnsRecord => "dns-record",
        };
        write!(f, "{name}")
    }
}

/// One declared resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub logical_id: LogicalId,
    pub kind: ResourceKind,
    pub properties: Value,
    pub depends_on: Vec<LogicalId>,
}

impl Resource {
    pub fn new(logical_id: impl Into<LogicalId>, kind: ResourceKind, properties: Value) -> Self {
        Self {
            logical_id: logical_id.into(),
            kind,
            properties,
            depends_on: Vec::new(),
        }
    }

    /// Declare an intra-unit predecessor.
    #[must_use]
    pub fn depends_on(mut self, id: impl Into<LogicalId>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    /// Stable name requested from the provisioning engine, if the unit chose
    /// one instead of letting the engine generate a physical name.
    pub fn requested_name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }
}

/// Insertion-ordered resource graph for one deployment unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource. Duplicate logical ids are rejected.
    pub fn push(&mut self, resource: Resource) -> std::result::Result<(), SynthError> {
        if self.get(&resource.logical_id).is_some() {
            return Err(SynthError::DuplicateLogicalId {
                id: resource.logical_id.to_string(),
            });
        }
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, id: &LogicalId) -> Option<&Resource> {
        self.resources.iter().find(|r| &r.logical_id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Check that every `depends_on` edge resolves within this graph.
    pub fn validate(&self) -> std::result::Result<(), SynthError> {
        for resource in &self.resources {
            for dep in &resource.depends_on {
                if self.get(dep).is_none() {
                    return Err(SynthError::UnresolvedReference {
                        id: resource.logical_id.to_string(),
                        missing: dep.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_logical_id_is_rejected() {
        let mut graph = ResourceGraph::new();
        graph
            .push(Resource::new("Bucket", ResourceKind::Bucket, json!({})))
            .unwrap();
        let err = graph
            .push(Resource::new("Bucket", ResourceKind::Bucket, json!({})))
            .unwrap_err();
        assert!(matches!(err, SynthError::DuplicateLogicalId { .. }));
    }

    #[test]
    fn dangling_dependency_fails_validation() {
        let mut graph = ResourceGraph::new();
        graph
            .push(
                Resource::new("Endpoint", ResourceKind::Endpoint, json!({}))
                    .depends_on("EndpointConfig"),
            )
            .unwrap();
        let err = graph.validate().unwrap_err();
        assert!(matches!(err, SynthError::UnresolvedReference { .. }));
    }

    #[test]
    fn requested_name_comes_from_properties() {
        let resource = Resource::new(
            "Endpoint",
            ResourceKind::Endpoint,
            json!({"name": "gpt2-endpoint"}),
        );
        assert_eq!(resource.requested_name(), Some("gpt2-endpoint"));
    }
}
