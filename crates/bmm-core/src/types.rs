//! Shared types exchanged with the orchestrator.

use serde::{Deserialize, Serialize};

/// The orchestrator's view of a node, as handed to each lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    /// Raw provider ID; empty when the node has not been registered yet.
    #[serde(default)]
    pub provider_id: String,
}

impl Node {
    pub fn new(name: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_id: provider_id.into(),
        }
    }
}

/// Kind of a published node address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeAddressType {
    Hostname,
    InternalIP,
    ExternalIP,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub address_type: NodeAddressType,
    pub address: String,
}

impl NodeAddress {
    pub fn new(address_type: NodeAddressType, address: impl Into<String>) -> Self {
        Self {
            address_type,
            address: address.into(),
        }
    }
}

/// Metadata published for a node on every metadata sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceMetadata {
    pub provider_id: String,
    pub instance_type: String,
    /// Interface addresses in interface order, then the node's hostname.
    pub node_addresses: Vec<NodeAddress>,
    pub zone: String,
    pub region: String,
}

/// Topology labels used for scheduling and affinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub failure_domain: String,
    pub region: String,
}

/// Optional orchestrator interfaces and whether this provider implements them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub instances_v2: bool,
    pub zones: bool,
    pub instances: bool,
    pub load_balancer: bool,
    pub routes: bool,
    pub clusters: bool,
}

impl Capabilities {
    pub fn supported(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter_map(|(name, on)| on.then_some(name))
            .collect()
    }

    pub fn unsupported(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter_map(|(name, on)| (!on).then_some(name))
            .collect()
    }

    fn entries(&self) -> [(&'static str, bool); 6] {
        [
            ("InstancesV2", self.instances_v2),
            ("Zones", self.zones),
            ("Instances", self.instances),
            ("LoadBalancer", self.load_balancer),
            ("Routes", self.routes),
            ("Clusters", self.clusters),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_address_json_shape() {
        let addr = NodeAddress::new(NodeAddressType::InternalIP, "10.0.0.1");
        let json = serde_json::to_value(&addr).unwrap();
        assert_eq!(json["type"], "InternalIP");
        assert_eq!(json["address"], "10.0.0.1");
    }

    #[test]
    fn test_capabilities_split() {
        let caps = Capabilities {
            instances_v2: true,
            zones: true,
            instances: false,
            load_balancer: false,
            routes: false,
            clusters: false,
        };
        assert_eq!(caps.supported(), vec!["InstancesV2", "Zones"]);
        assert_eq!(
            caps.unsupported(),
            vec!["Instances", "LoadBalancer", "Routes", "Clusters"]
        );
    }
}
