//! Instance lifecycle mapping.
//!
//! Turns the raw outcome of one instance lookup into the three signals the
//! orchestrator asks for: existence, shutdown state, and node metadata.
//! Everything here is a pure function of its inputs.

use tracing::{debug, warn};
use uuid::Uuid;

use bmm_core::{AbsencePolicy, InstanceMetadata, Node, NodeAddress, NodeAddressType};

use crate::error::{CloudError, CloudResult};
use crate::lookup::{Instance, InstanceResponse, LookupError};
use crate::topology;

pub const INSTANCE_TYPE: &str = "nvidia-bmm-instance";
pub const UNKNOWN_INSTANCE_TYPE: &str = "unknown";

/// Lifecycle status reported by the remote system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceStatus {
    Terminating,
    Terminated,
    Error,
    /// Any other token, kept verbatim (`Ready`, `Running`, `Provisioning`, ...).
    Other(String),
}

impl InstanceStatus {
    /// Parse a case-sensitive status token. Empty tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let status = match token {
            "" => return None,
            "Terminating" => InstanceStatus::Terminating,
            "Terminated" => InstanceStatus::Terminated,
            "Error" => InstanceStatus::Error,
            other => InstanceStatus::Other(other.to_string()),
        };
        Some(status)
    }

    pub fn is_shutdown(&self) -> bool {
        match self {
            InstanceStatus::Terminating | InstanceStatus::Terminated | InstanceStatus::Error => true,
            InstanceStatus::Other(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InstanceStatus::Terminating => "Terminating",
            InstanceStatus::Terminated => "Terminated",
            InstanceStatus::Error => "Error",
            InstanceStatus::Other(token) => token,
        }
    }
}

/// Reduce a lookup outcome to the instance body or a typed error.
pub fn classify(
    instance_id: Uuid,
    result: Result<InstanceResponse, LookupError>,
) -> CloudResult<Instance> {
    let response = result.map_err(|e| CloudError::LookupFailed {
        instance_id,
        reason: e.to_string(),
    })?;

    match response {
        InstanceResponse {
            status: InstanceResponse::OK,
            body: Some(instance),
        } => Ok(instance),
        InstanceResponse {
            status: InstanceResponse::NOT_FOUND,
            ..
        } => Err(CloudError::LookupNotFound(instance_id)),
        InstanceResponse { status, .. } => {
            Err(CloudError::LookupUnexpectedStatus { instance_id, status })
        }
    }
}

/// Whether the instance exists.
///
/// A definitive not-found is always `false`. Other failures are `false`
/// under [`AbsencePolicy::Lenient`] and errors under [`AbsencePolicy::Strict`].
pub fn exists(
    instance_id: Uuid,
    result: Result<InstanceResponse, LookupError>,
    policy: AbsencePolicy,
) -> CloudResult<bool> {
    match classify(instance_id, result) {
        Ok(_) => Ok(true),
        Err(e @ CloudError::LookupNotFound(_)) => {
            warn!(%instance_id, error = %e, "instance not found");
            Ok(false)
        }
        Err(e) => match policy {
            AbsencePolicy::Lenient => {
                warn!(%instance_id, error = %e, "instance lookup failed, treating as not found");
                Ok(false)
            }
            AbsencePolicy::Strict => Err(e),
        },
    }
}

pub fn is_shutdown(
    instance_id: Uuid,
    result: Result<InstanceResponse, LookupError>,
) -> CloudResult<bool> {
    let instance = classify(instance_id, result)?;
    let status = instance.status.as_deref().and_then(InstanceStatus::parse);
    Ok(status.is_some_and(|s| s.is_shutdown()))
}

/// Build node metadata from the instance and the locally configured site.
pub fn metadata(
    node: &Node,
    instance_id: Uuid,
    site: &str,
    result: Result<InstanceResponse, LookupError>,
) -> CloudResult<InstanceMetadata> {
    let instance = classify(instance_id, result)?;

    let mut node_addresses: Vec<NodeAddress> = instance
        .interfaces
        .iter()
        .flatten()
        .flat_map(|iface| iface.ip_addresses.iter().flatten())
        .map(|ip| NodeAddress::new(NodeAddressType::InternalIP, ip.as_str()))
        .collect();
    node_addresses.push(NodeAddress::new(NodeAddressType::Hostname, node.name.as_str()));

    let instance_type = if instance.id.is_some() {
        INSTANCE_TYPE
    } else {
        UNKNOWN_INSTANCE_TYPE
    };

    let metadata = InstanceMetadata {
        provider_id: node.provider_id.clone(),
        instance_type: instance_type.to_string(),
        node_addresses,
        zone: topology::zone_of(site),
        region: topology::region_of(site),
    };
    debug!(node = %node.name, ?metadata, "instance metadata");
    Ok(metadata)
}
