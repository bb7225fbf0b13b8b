//! Edge/delivery unit configuration.

use serde::Deserialize;

/// How the frontend bucket is exposed.
///
/// Both postures appeared in deployed revisions of this system; the choice is
/// explicit configuration rather than an implicit latest-revision default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPosture {
    /// Bucket readable only by the distribution's identity (least privilege).
    #[default]
    DistributionOnly,
    /// Bucket readable by anyone; simpler, weaker.
    PublicRead,
}

/// Configuration for the edge/delivery unit.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Apex domain for the site. The API and distribution bind under it.
    #[serde(default)]
    pub domain: String,
    /// Also bind `www.<domain>` records and certificate names.
    #[serde(default = "default_include_www")]
    pub include_www: bool,
    #[serde(default)]
    pub posture: AccessPosture,
    /// Origins allowed by the API's CORS configuration.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_include_www() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            domain: "example.com".into(),
            include_www: true,
            posture: AccessPosture::default(),
            cors_origins: default_cors_origins(),
        }
    }
}
