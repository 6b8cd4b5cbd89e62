//! Cloud-config parser.
//!
//! The provider reads a TOML cloud-config file and then lets environment
//! variables override individual keys:
//!
//! ```toml
//! endpoint = "https://api.carbide.example"
//! orgName = "my-org"
//! token = "..."
//! siteId = "site-east-1"
//! tenantId = "my-tenant"
//! absencePolicy = "lenient"
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_ENDPOINT: &str = "NVIDIA_BMM_ENDPOINT";
pub const ENV_ORG_NAME: &str = "NVIDIA_BMM_ORG_NAME";
pub const ENV_TOKEN: &str = "NVIDIA_BMM_TOKEN";
pub const ENV_SITE_ID: &str = "NVIDIA_BMM_SITE_ID";
pub const ENV_TENANT_ID: &str = "NVIDIA_BMM_TENANT_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("endpoint must be an http(s) URL: {0}")]
    InvalidEndpoint(String),
    #[error("requestTimeoutSecs must be greater than zero")]
    ZeroTimeout,
}

/// How `instance_exists` treats lookups that did not return a definitive answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsencePolicy {
    /// Any failure (not found, transport error, unexpected status) means the
    /// instance is gone.
    #[default]
    Lenient,
    /// Only a definitive not-found means gone; other failures are errors.
    Strict,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudConfig {
    /// REST API endpoint URL.
    pub endpoint: String,
    pub org_name: String,
    /// API bearer token.
    pub token: String,
    pub site_id: String,
    pub tenant_id: String,
    pub absence_policy: AbsencePolicy,
    /// Per-request timeout for the instance lookup.
    pub request_timeout_secs: Option<u64>,
}

impl fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudConfig")
            .field("endpoint", &self.endpoint)
            .field("org_name", &self.org_name)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("site_id", &self.site_id)
            .field("tenant_id", &self.tenant_id)
            .field("absence_policy", &self.absence_policy)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl CloudConfig {
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Parse a TOML cloud-config. Blank input yields an empty config.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the optional file, apply process environment overrides, validate.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override keys with non-empty values returned by `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 5] = [
            (ENV_ENDPOINT, &mut self.endpoint),
            (ENV_ORG_NAME, &mut self.org_name),
            (ENV_TOKEN, &mut self.token),
            (ENV_SITE_ID, &mut self.site_id),
            (ENV_TENANT_ID, &mut self.tenant_id),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::Missing("endpoint"));
        }
        if self.org_name.is_empty() {
            return Err(ConfigError::Missing("orgName"));
        }
        if self.token.is_empty() {
            return Err(ConfigError::Missing("token"));
        }
        if self.site_id.is_empty() {
            return Err(ConfigError::Missing("siteId"));
        }
        if self.tenant_id.is_empty() {
            return Err(ConfigError::Missing("tenantId"));
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs
            .unwrap_or(Self::DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}
