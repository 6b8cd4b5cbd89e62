//! The NVIDIA BMM cloud provider.
//!
//! Composes the provider ID codec, the instance lookup, the lifecycle
//! mapper, and the topology deriver behind the calls the orchestrator makes
//! for each node. Holds no mutable state; every call is independent.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use bmm_core::{
    AbsencePolicy, Capabilities, CloudConfig, InstanceMetadata, Node, PROVIDER_NAME, ProviderId,
    Zone,
};

use crate::error::{CloudError, CloudResult};
use crate::lifecycle;
use crate::lookup::InstanceLookup;
use crate::rest::RestInstanceLookup;
use crate::topology;

pub struct NvidiaBmmCloud {
    lookup: Arc<dyn InstanceLookup>,
    org_name: String,
    site_id: String,
    tenant_id: String,
    absence_policy: AbsencePolicy,
}

impl NvidiaBmmCloud {
    /// Load balancers and routes are left to external solutions (MetalLB,
    /// kube-vip, site hardware).
    pub const CAPABILITIES: Capabilities = Capabilities {
        instances_v2: true,
        zones: true,
        instances: false,
        load_balancer: false,
        routes: false,
        clusters: false,
    };

    /// Validate the config and build a provider backed by the REST API.
    pub fn from_config(config: &CloudConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let lookup = RestInstanceLookup::from_config(config)?;

        info!(
            org = %config.org_name,
            site = %config.site_id,
            policy = ?config.absence_policy,
            "NVIDIA BMM cloud provider initialized"
        );

        Ok(Self::with_lookup(
            Arc::new(lookup),
            &config.org_name,
            &config.site_id,
            &config.tenant_id,
        )
        .with_absence_policy(config.absence_policy))
    }

    /// Build a provider around an injected lookup.
    pub fn with_lookup(
        lookup: Arc<dyn InstanceLookup>,
        org_name: &str,
        site_id: &str,
        tenant_id: &str,
    ) -> Self {
        Self {
            lookup,
            org_name: org_name.to_string(),
            site_id: site_id.to_string(),
            tenant_id: tenant_id.to_string(),
            absence_policy: AbsencePolicy::default(),
        }
    }

    pub fn with_absence_policy(mut self, policy: AbsencePolicy) -> Self {
        self.absence_policy = policy;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    pub fn capabilities(&self) -> Capabilities {
        Self::CAPABILITIES
    }

    pub fn has_cluster_id(&self) -> bool {
        true
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    // ── Instances ───────────────────────────────────────────────

    /// Whether the node's backing instance still exists.
    ///
    /// Provider ID errors are returned; lookup failures follow the
    /// configured [`AbsencePolicy`].
    pub async fn instance_exists(&self, node: &Node) -> CloudResult<bool> {
        let instance_id = instance_id_of(node)?;
        let result = self.lookup.get_instance(&self.org_name, instance_id).await;
        lifecycle::exists(instance_id, result, self.absence_policy)
    }

    /// Whether the node's backing instance is terminating, terminated, or errored.
    pub async fn instance_shutdown(&self, node: &Node) -> CloudResult<bool> {
        let instance_id = instance_id_of(node)?;
        let result = self.lookup.get_instance(&self.org_name, instance_id).await;
        lifecycle::is_shutdown(instance_id, result)
    }

    pub async fn instance_metadata(&self, node: &Node) -> CloudResult<InstanceMetadata> {
        let instance_id = instance_id_of(node)?;
        let result = self.lookup.get_instance(&self.org_name, instance_id).await;
        lifecycle::metadata(node, instance_id, &self.site_id, result)
    }

    // ── Zones ───────────────────────────────────────────────────
    // All nodes of a cluster live in the configured site.

    pub fn get_zone(&self) -> Zone {
        topology::topology_of(&self.site_id)
    }

    /// Zone for a provider ID. The ID must decode, but the answer comes
    /// from the configured site.
    pub fn get_zone_by_provider_id(&self, provider_id: &str) -> CloudResult<Zone> {
        ProviderId::parse(provider_id)?;
        Ok(self.get_zone())
    }

    pub fn get_zone_by_node_name(&self, _node_name: &str) -> Zone {
        self.get_zone()
    }
}

fn instance_id_of(node: &Node) -> CloudResult<Uuid> {
    if node.provider_id.is_empty() {
        return Err(CloudError::MissingProviderId(node.name.clone()));
    }
    Ok(ProviderId::parse(&node.provider_id)?.instance_id())
}
