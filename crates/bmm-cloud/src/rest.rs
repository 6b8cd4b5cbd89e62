//! REST-backed [`InstanceLookup`].
//!
//! Issues `GET {endpoint}/v2/org/{org}/carbide/instance/{id}` with a bearer
//! token. Only 200 responses are decoded; every other status is handed back
//! as-is so the lifecycle mapper can classify it.

use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use uuid::Uuid;

use bmm_core::CloudConfig;

use crate::lookup::{Instance, InstanceLookup, InstanceResponse, LookupError};

pub struct RestInstanceLookup {
    client: Client,
    endpoint: Url,
    token: String,
}

impl RestInstanceLookup {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("invalid endpoint URL: {endpoint}"))?;
        if endpoint.cannot_be_a_base() {
            bail!("endpoint URL cannot carry a path: {endpoint}");
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nvidia-bmm-ccm/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &CloudConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.endpoint,
            &config.token,
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    /// Path parameters are pushed as single segments, so reserved characters
    /// in the organization name are percent-encoded.
    fn instance_url(&self, org: &str, instance_id: Uuid) -> Url {
        let mut url = self.endpoint.clone();
        let id = instance_id.to_string();
        // Checked in `new`: the endpoint can be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v2", "org", org, "carbide", "instance", id.as_str()]);
        }
        url
    }
}

#[async_trait]
impl InstanceLookup for RestInstanceLookup {
    async fn get_instance(
        &self,
        org: &str,
        instance_id: Uuid,
    ) -> Result<InstanceResponse, LookupError> {
        let url = self.instance_url(org, instance_id);

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(%url, %status, "instance lookup");

        if status != StatusCode::OK {
            return Ok(InstanceResponse::with_status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let instance: Instance =
            serde_json::from_slice(&bytes).map_err(|e| LookupError::Decode(e.to_string()))?;

        Ok(InstanceResponse::found(instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> Uuid {
        Uuid::parse_str("12345678-1234-1234-1234-123456789abc").unwrap()
    }

    fn lookup(endpoint: &str) -> RestInstanceLookup {
        RestInstanceLookup::new(endpoint, "t", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn instance_url_trims_trailing_slash() {
        assert_eq!(
            lookup("https://api.carbide.test/").instance_url("test-org", id()).as_str(),
            "https://api.carbide.test/v2/org/test-org/carbide/instance/12345678-1234-1234-1234-123456789abc"
        );
    }

    #[test]
    fn instance_url_keeps_endpoint_path() {
        assert_eq!(
            lookup("https://gw.test/carbide-api/").instance_url("o", id()).as_str(),
            "https://gw.test/carbide-api/v2/org/o/carbide/instance/12345678-1234-1234-1234-123456789abc"
        );
    }

    #[test]
    fn instance_url_escapes_org() {
        let lookup = lookup("https://api.carbide.test");
        let cases = [
            ("acme#prod", "acme%23prod"),
            ("team/a", "team%2Fa"),
            ("a?b", "a%3Fb"),
            ("a b", "a%20b"),
        ];
        for (org, encoded) in cases {
            let url = lookup.instance_url(org, id());
            assert_eq!(
                url.path(),
                format!("/v2/org/{encoded}/carbide/instance/12345678-1234-1234-1234-123456789abc"),
                "org {org:?}"
            );
            assert!(url.query().is_none());
            assert!(url.fragment().is_none());
        }
    }

    #[test]
    fn invalid_endpoint_is_rejected_at_construction() {
        assert!(RestInstanceLookup::new("not a url", "t", Duration::from_secs(1)).is_err());
        assert!(RestInstanceLookup::new("mailto:ops@example.com", "t", Duration::from_secs(1)).is_err());
    }
}
