//! Edge/delivery unit: public API, static frontend, distribution, DNS.
//!
//! Depends on the backend handlers existing first; routes are bound to the
//! entry-point identifiers the backend published, and distribution creation
//! requires a stable origin reference.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::backend::PUBLIC_HANDLERS;
use super::{DeploymentUnit, Materialized, SynthInputs};
use crate::config::{AccessPosture, EdgeConfig};
use crate::domain::{keys, LogicalId, ParamKey, Resource, ResourceGraph, ResourceKind};
use crate::error::Result;
use crate::store::ParameterStore;

const FRONTEND_BUCKET: &str = "FrontendBucket";
const FRONTEND_DEPLOYMENT: &str = "FrontendDeployment";
const BUCKET_POLICY: &str = "FrontendBucketPolicy";
const REST_API: &str = "RestApi";
const CERTIFICATE: &str = "SiteCertificate";
const OAC: &str = "OriginAccessControl";
const DISTRIBUTION: &str = "Distribution";

pub struct EdgeUnit {
    config: EdgeConfig,
}

impl EdgeUnit {
    pub fn new(config: EdgeConfig) -> Self {
        Self { config }
    }

    fn domains(&self) -> Vec<String> {
        let mut names = vec![self.config.domain.clone()];
        if self.config.include_www {
            names.push(format!("www.{}", self.config.domain));
        }
        names
    }
}

#[async_trait]
impl DeploymentUnit for EdgeUnit {
    fn name(&self) -> &'static str {
        "edge"
    }

    fn depends_on(&self) -> Vec<&'static str> {
        vec!["backend"]
    }

    fn reads(&self) -> Vec<ParamKey> {
        PUBLIC_HANDLERS
            .iter()
            .map(|h| keys::handler_entry_point(h))
            .collect()
    }

    fn writes(&self) -> Vec<ParamKey> {
        vec![
            keys::api_url(),
            keys::distribution_id(),
            keys::frontend_bucket(),
        ]
    }

    fn synthesize(&self, inputs: &SynthInputs) -> Result<ResourceGraph> {
        let mut graph = ResourceGraph::new();

        let public_read = self.config.posture == AccessPosture::PublicRead;

        graph.push(Resource::new(
            FRONTEND_BUCKET,
            ResourceKind::Bucket,
            json!({
                "website": { "index": "index.html", "error": "error.html" },
                "public_read": public_read,
            }),
        ))?;

        graph.push(
            Resource::new(
                FRONTEND_DEPLOYMENT,
                ResourceKind::BucketDeployment,
                json!({ "source": "web_pages/" }),
            )
            .depends_on(FRONTEND_BUCKET),
        )?;

        let routes: Vec<serde_json::Value> = PUBLIC_HANDLERS
            .iter()
            .map(|handler| {
                let entry_point = inputs.get(&keys::handler_entry_point(handler))?;
                Ok(json!({
                    "path": format!("/{handler}"),
                    "method": if *handler == "ping" { "GET" } else { "POST" },
                    "target": entry_point,
                }))
            })
            .collect::<Result<_>>()?;

        graph.push(Resource::new(
            REST_API,
            ResourceKind::RestApi,
            json!({
                "stage": "prod",
                "throttling": { "rate_limit": 100.0, "burst_limit": 200 },
                "cors": {
                    "allow_origins": self.config.cors_origins,
                    "allow_methods": ["GET", "POST", "OPTIONS"],
                    "allow_headers": ["Content-Type"],
                },
                "routes": routes,
            }),
        ))?;

        graph.push(Resource::new(
            CERTIFICATE,
            ResourceKind::Certificate,
            json!({
                "domain": self.config.domain,
                "alternative_names": if self.config.include_www {
                    vec![format!("www.{}", self.config.domain)]
                } else {
                    Vec::new()
                },
                "validation": "dns",
            }),
        ))?;

        let mut distribution = Resource::new(
            DISTRIBUTION,
            ResourceKind::Distribution,
            json!({
                "domains": self.domains(),
                "default_root_object": "index.html",
                "origin": FRONTEND_BUCKET,
                "certificate": CERTIFICATE,
                "viewer_protocol": "redirect-to-https",
            }),
        )
        .depends_on(FRONTEND_BUCKET)
        .depends_on(CERTIFICATE);

        match self.config.posture {
            AccessPosture::DistributionOnly => {
                graph.push(Resource::new(
                    OAC,
                    ResourceKind::OriginAccessControl,
                    json!({
                        "name": format!("{}-oac", self.config.domain),
                        "origin_type": "storage",
                        "signing": "always",
                    }),
                ))?;
                distribution = distribution.depends_on(OAC);
                distribution.properties["origin_access_control"] = json!(OAC);
                graph.push(distribution)?;

                // Only the distribution's identity may read the bucket.
                graph.push(
                    Resource::new(
                        BUCKET_POLICY,
                        ResourceKind::BucketPolicy,
                        json!({
                            "bucket": FRONTEND_BUCKET,
                            "statement": {
                                "actions": ["storage:GetObject"],
                                "principal": "content-delivery-service",
                                "condition_source": DISTRIBUTION,
                            },
                        }),
                    )
                    .depends_on(FRONTEND_BUCKET)
                    .depends_on(DISTRIBUTION),
                )?;
            }
            AccessPosture::PublicRead => {
                graph.push(distribution)?;
                graph.push(
                    Resource::new(
                        BUCKET_POLICY,
                        ResourceKind::BucketPolicy,
                        json!({
                            "bucket": FRONTEND_BUCKET,
                            "statement": {
                                "actions": ["storage:GetObject"],
                                "principal": "*",
                            },
                        }),
                    )
                    .depends_on(FRONTEND_BUCKET),
                )?;
            }
        }

        for domain in self.domains() {
            for record_type in ["A", "AAAA"] {
                graph.push(
                    Resource::new(
                        format!("Alias{record_type}{domain}").replace('.', "-"),
                        ResourceKind::DnsRecord,
                        json!({
                            "record_name": domain,
                            "record_type": record_type,
                            "alias_target": DISTRIBUTION,
                        }),
                    )
                    .depends_on(DISTRIBUTION),
                )?;
            }
        }

        graph.validate()?;
        Ok(graph)
    }

    async fn publish(
        &self,
        materialized: &Materialized,
        store: &dyn ParameterStore,
    ) -> Result<()> {
        let api_id = materialized.physical(&LogicalId::new(REST_API))?;
        let distribution = materialized.physical(&LogicalId::new(DISTRIBUTION))?;
        let bucket = materialized.physical(&LogicalId::new(FRONTEND_BUCKET))?;

        let api_url = format!("https://{api_id}/prod/");
        store.put(&keys::api_url(), &api_url).await?;
        store.put(&keys::distribution_id(), distribution).await?;
        store.put(&keys::frontend_bucket(), bucket).await?;

        info!(api_url, distribution, bucket, "Edge identifiers published");
        Ok(())
    }
}
