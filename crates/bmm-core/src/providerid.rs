//! Provider ID codec.
//!
//! A node's provider ID is the only durable handle the orchestrator keeps
//! for the backing instance. It carries the full organization, tenant and
//! site context so later calls never need out-of-band lookup state:
//!
//! ```text
//! nvidia-bmm://<organization>/<tenant>/<site>/<instance-uuid>
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Cloud provider name, also used as the provider ID scheme.
pub const PROVIDER_NAME: &str = "nvidia-bmm";

const SCHEME_PREFIX: &str = "nvidia-bmm://";

/// Length of a canonical 8-4-4-4-12 hyphenated UUID.
const HYPHENATED_UUID_LEN: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderIdError {
    #[error("malformed provider ID: {0}")]
    Malformed(String),
    #[error("invalid instance ID: {0}")]
    InvalidInstanceId(String),
    #[error("invalid provider identity: {0}")]
    InvalidIdentity(String),
}

/// Decoded provider ID of a bare-metal instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderId {
    organization: String,
    tenant: String,
    site: String,
    instance_id: Uuid,
}

impl ProviderId {
    /// Build a provider ID from its parts.
    ///
    /// Every segment must be non-empty and free of `/`, and the instance
    /// ID must not be the nil UUID.
    pub fn new(
        organization: impl Into<String>,
        tenant: impl Into<String>,
        site: impl Into<String>,
        instance_id: Uuid,
    ) -> Result<Self, ProviderIdError> {
        let organization = organization.into();
        let tenant = tenant.into();
        let site = site.into();

        for (field, value) in [
            ("organization", &organization),
            ("tenant", &tenant),
            ("site", &site),
        ] {
            if value.is_empty() {
                return Err(ProviderIdError::InvalidIdentity(format!("{field} is empty")));
            }
            if value.contains('/') {
                return Err(ProviderIdError::InvalidIdentity(format!(
                    "{field} contains '/': {value}"
                )));
            }
        }
        if instance_id.is_nil() {
            return Err(ProviderIdError::InvalidIdentity(
                "instance ID is the nil UUID".to_string(),
            ));
        }

        Ok(Self {
            organization,
            tenant,
            site,
            instance_id,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, ProviderIdError> {
        let rest = raw
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| ProviderIdError::Malformed(format!("missing {SCHEME_PREFIX} prefix: {raw:?}")))?;

        let segments: Vec<&str> = rest.split('/').collect();
        let [organization, tenant, site, instance] = segments.as_slice() else {
            return Err(ProviderIdError::Malformed(format!(
                "expected 4 segments, found {}: {raw:?}",
                segments.len()
            )));
        };
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ProviderIdError::Malformed(format!("empty segment: {raw:?}")));
        }

        if instance.len() != HYPHENATED_UUID_LEN {
            return Err(ProviderIdError::InvalidInstanceId(instance.to_string()));
        }
        let instance_id = Uuid::try_parse(instance)
            .map_err(|e| ProviderIdError::InvalidInstanceId(format!("{instance}: {e}")))?;
        if instance_id.is_nil() {
            return Err(ProviderIdError::InvalidInstanceId(instance.to_string()));
        }

        Ok(Self {
            organization: organization.to_string(),
            tenant: tenant.to_string(),
            site: site.to_string(),
            instance_id,
        })
    }

    /// Encoded wire form. Exact inverse of [`ProviderId::parse`].
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME_PREFIX}{}/{}/{}/{}",
            self.organization,
            self.tenant,
            self.site,
            self.instance_id.hyphenated()
        )
    }
}

impl FromStr for ProviderId {
    type Err = ProviderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ProviderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProviderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANCE: &str = "12345678-1234-1234-1234-123456789abc";

    fn instance_id() -> Uuid {
        Uuid::parse_str(INSTANCE).unwrap()
    }

    #[test]
    fn test_encode() {
        let pid = ProviderId::new("org1", "tenant1", "site-east-1", instance_id()).unwrap();
        assert_eq!(
            pid.encode(),
            format!("nvidia-bmm://org1/tenant1/site-east-1/{INSTANCE}")
        );
    }

    #[test]
    fn test_parse() {
        let pid = ProviderId::parse(&format!("nvidia-bmm://myorg/mytenant/mysite/{INSTANCE}")).unwrap();
        assert_eq!(pid.organization(), "myorg");
        assert_eq!(pid.tenant(), "mytenant");
        assert_eq!(pid.site(), "mysite");
        assert_eq!(pid.instance_id(), instance_id());
    }

    #[test]
    fn test_round_trip() {
        for (org, tenant, site) in [
            ("test-org", "test-tenant", "8a880c71-fe4b-4e43-9e24-ebfcb8a84c5f"),
            ("o", "t", "s"),
            ("org.with.dots", "tenant_1", "site-west-2"),
        ] {
            let pid = ProviderId::new(org, tenant, site, Uuid::new_v4()).unwrap();
            assert_eq!(ProviderId::parse(&pid.encode()).unwrap(), pid);
        }
    }

    #[test]
    fn test_uppercase_uuid_normalizes() {
        let raw = format!("nvidia-bmm://o/t/s/{}", INSTANCE.to_uppercase());
        let pid: ProviderId = raw.parse().unwrap();
        assert_eq!(pid.instance_id(), instance_id());
        assert_eq!(pid.encode(), format!("nvidia-bmm://o/t/s/{INSTANCE}"));
    }

    #[test]
    fn test_parse_malformed() {
        for raw in [
            "",
            "invalid-format",
            "aws://org/tenant/site/12345678-1234-1234-1234-123456789abc",
            "nvidia-bmm://org/site",
            "nvidia-bmm://org/tenant/site",
            "nvidia-bmm://org/tenant/site/extra/12345678-1234-1234-1234-123456789abc",
            "nvidia-bmm://org//site/12345678-1234-1234-1234-123456789abc",
            "nvidia-bmm://org/tenant/site/",
        ] {
            assert!(
                matches!(ProviderId::parse(raw), Err(ProviderIdError::Malformed(_))),
                "expected malformed: {raw:?}"
            );
        }
    }

    #[test]
    fn test_parse_invalid_instance_id() {
        for raw in [
            "nvidia-bmm://org/tenant/site/not-a-uuid",
            "nvidia-bmm://org/tenant/site/123456781234123412341234567890ab",
            "nvidia-bmm://org/tenant/site/zzzzzzzz-1234-1234-1234-123456789abc",
            "nvidia-bmm://org/tenant/site/00000000-0000-0000-0000-000000000000",
        ] {
            assert!(
                matches!(ProviderId::parse(raw), Err(ProviderIdError::InvalidInstanceId(_))),
                "expected invalid instance ID: {raw:?}"
            );
        }
    }

    #[test]
    fn test_new_rejects_invalid_identity() {
        let id = instance_id();
        assert!(matches!(
            ProviderId::new("", "t", "s", id),
            Err(ProviderIdError::InvalidIdentity(_))
        ));
        assert!(matches!(
            ProviderId::new("o", "", "s", id),
            Err(ProviderIdError::InvalidIdentity(_))
        ));
        assert!(matches!(
            ProviderId::new("o", "t", "a/b", id),
            Err(ProviderIdError::InvalidIdentity(_))
        ));
        assert!(matches!(
            ProviderId::new("o", "t", "s", Uuid::nil()),
            Err(ProviderIdError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let pid = ProviderId::new("o", "t", "s", instance_id()).unwrap();
        let json = serde_json::to_string(&pid).unwrap();
        assert_eq!(json, format!("\"nvidia-bmm://o/t/s/{INSTANCE}\""));

        let back: ProviderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pid);
        assert!(serde_json::from_str::<ProviderId>("\"nvidia-bmm://o/t/s\"").is_err());
    }
}
