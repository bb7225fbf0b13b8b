//! HTTP-backed parameter store client.
//!
//! Talks to an external store service: `GET {base}/params/{key}` returns the
//! parameter document, `PUT {base}/params/{key}` upserts. A 404 maps to
//! `NotFound`; transport failures and 5xx responses map to `Transient` so
//! cold-start callers can apply bounded retry.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::ParameterStore;
use crate::domain::{ParamKey, Parameter};
use crate::error::{LookupError, Result};

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    version: u64,
}

pub struct HttpStore {
    client: Client,
    base_url: Url,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        // `Url::join` treats a base without a trailing slash as a file and
        // would replace its last path segment.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            client: Client::new(),
            base_url: base,
        })
    }

    fn param_url(&self, key: &ParamKey) -> std::result::Result<Url, LookupError> {
        let path = format!("params{}", key.as_str());
        self.base_url
            .join(&path)
            .map_err(|e| LookupError::Transient {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait::async_trait]
impl ParameterStore for HttpStore {
    async fn get(&self, key: &ParamKey) -> std::result::Result<Parameter, LookupError> {
        let url = self.param_url(key)?;
        debug!(key = %key, url = %url, "Fetching parameter");

        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| LookupError::Transient {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(LookupError::NotFound {
                key: key.to_string(),
            }),
            status if status.is_success() => {
                response
                    .json::<Parameter>()
                    .await
                    .map_err(|e| LookupError::Transient {
                        key: key.to_string(),
                        reason: e.to_string(),
                    })
            }
            status => Err(LookupError::Transient {
                key: key.to_string(),
                reason: format!("store returned {status}"),
            }),
        }
    }

    async fn put(&self, key: &ParamKey, value: &str) -> std::result::Result<u64, LookupError> {
        let url = self.param_url(key)?;
        debug!(key = %key, url = %url, "Publishing parameter");

        let response = self
            .client
            .put(url)
            .json(&PutRequest { value })
            .send()
            .await
            .map_err(|e| LookupError::Transient {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transient {
                key: key.to_string(),
                reason: format!("store returned {status}"),
            });
        }

        let body: PutResponse = response.json().await.map_err(|e| LookupError::Transient {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(body.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keys;

    #[test]
    fn base_path_without_trailing_slash_is_preserved() {
        let store = HttpStore::new("https://host/api").unwrap();
        let url = store.param_url(&keys::endpoint_name()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://host/api/params/ml-pipeline/sagemaker/endpoint-name"
        );
    }

    #[test]
    fn trailing_slash_base_resolves_identically() {
        let with = HttpStore::new("https://host/api/").unwrap();
        let without = HttpStore::new("https://host/api").unwrap();
        let key = keys::model_version();
        assert_eq!(
            with.param_url(&key).unwrap(),
            without.param_url(&key).unwrap()
        );
    }

    #[test]
    fn bare_host_base_keeps_the_params_root() {
        let store = HttpStore::new("https://host").unwrap();
        let url = store.param_url(&keys::model_version()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://host/params/ml-pipeline/model/latest-version"
        );
    }
}
