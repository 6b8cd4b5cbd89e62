use std::path::Path;

use anyhow::Context;
use tracing::info;

use bmm_cloud::NvidiaBmmCloud;
use bmm_core::{CloudConfig, Node, PROVIDER_NAME};

fn build_provider(config_path: Option<&Path>) -> anyhow::Result<NvidiaBmmCloud> {
    let config = CloudConfig::load(config_path).context("invalid cloud configuration")?;
    NvidiaBmmCloud::from_config(&config)
}

/// Static provider facts; with a config, also the context the provider runs in.
pub fn info(config: Option<&Path>) -> anyhow::Result<()> {
    let caps = NvidiaBmmCloud::CAPABILITIES;
    println!("NVIDIA BMM Cloud Controller Manager");
    println!("provider: {PROVIDER_NAME}");
    println!("implements: {}", caps.supported().join(", "));
    println!("does not implement: {}", caps.unsupported().join(", "));

    if config.is_some() {
        let cloud = build_provider(config)?;
        let zone = cloud.get_zone();
        println!("organization: {}", cloud.org_name());
        println!("tenant: {}", cloud.tenant_id());
        println!("site: {}", cloud.site_id());
        println!("zone: {}", zone.failure_domain);
        println!("region: {}", zone.region);
    }
    Ok(())
}

pub async fn exists(config: Option<&Path>, node_name: &str, provider_id: &str) -> anyhow::Result<()> {
    let cloud = build_provider(config)?;
    let exists = cloud
        .instance_exists(&Node::new(node_name, provider_id))
        .await?;
    info!(node = node_name, exists, "instance existence checked");
    println!("{exists}");
    Ok(())
}

pub async fn shutdown(config: Option<&Path>, node_name: &str, provider_id: &str) -> anyhow::Result<()> {
    let cloud = build_provider(config)?;
    let shutdown = cloud
        .instance_shutdown(&Node::new(node_name, provider_id))
        .await?;
    info!(node = node_name, shutdown, "instance shutdown state checked");
    println!("{shutdown}");
    Ok(())
}

pub async fn metadata(config: Option<&Path>, node_name: &str, provider_id: &str) -> anyhow::Result<()> {
    let cloud = build_provider(config)?;
    let metadata = cloud
        .instance_metadata(&Node::new(node_name, provider_id))
        .await?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

pub fn zone(config: Option<&Path>, provider_id: Option<&str>) -> anyhow::Result<()> {
    let cloud = build_provider(config)?;
    let zone = match provider_id {
        Some(pid) => cloud.get_zone_by_provider_id(pid)?,
        None => cloud.get_zone(),
    };
    println!("{}", serde_json::to_string_pretty(&zone)?);
    Ok(())
}
