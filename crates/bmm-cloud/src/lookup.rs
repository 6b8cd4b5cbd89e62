//! Remote instance lookup.
//!
//! The provider never talks to the REST API directly; it goes through an
//! [`InstanceLookup`] so the lifecycle logic can run against any backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Failure to obtain any HTTP answer for a lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Network interface of a remote instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_addresses: Option<Vec<String>>,
}

impl Interface {
    pub fn with_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ip_addresses: Some(addresses.into_iter().map(Into::into).collect()),
        }
    }
}

/// Read-only view of a remote instance at lookup time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interfaces: Option<Vec<Interface>>,
}

/// Raw outcome of a lookup that reached the remote system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body, present only for a 200 response.
    pub body: Option<Instance>,
}

impl InstanceResponse {
    pub const OK: u16 = 200;
    pub const NOT_FOUND: u16 = 404;

    pub fn found(instance: Instance) -> Self {
        Self {
            status: Self::OK,
            body: Some(instance),
        }
    }

    pub fn not_found() -> Self {
        Self::with_status(Self::NOT_FOUND)
    }

    pub fn with_status(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Fetches a single instance by organization and instance ID.
///
/// Implementations must be safe for concurrent use; retries and timeouts
/// are their responsibility.
#[async_trait]
pub trait InstanceLookup: Send + Sync {
    async fn get_instance(
        &self,
        org: &str,
        instance_id: Uuid,
    ) -> Result<InstanceResponse, LookupError>;
}
