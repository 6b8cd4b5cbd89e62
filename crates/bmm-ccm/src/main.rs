//! nvidia-bmm-ccm — NVIDIA BMM cloud controller manager entry point.
//!
//! Loads the cloud-config, builds the provider, and answers the node
//! lifecycle queries a cloud controller manager issues, one per invocation:
//!
//! ```text
//! nvidia-bmm-ccm --cloud-config /etc/kubernetes/cloud.toml info
//! nvidia-bmm-ccm --cloud-config cloud.toml exists --node-name n1 --provider-id nvidia-bmm://...
//! nvidia-bmm-ccm --cloud-config cloud.toml metadata --node-name n1 --provider-id nvidia-bmm://...
//! ```
//!
//! Environment variables (`NVIDIA_BMM_*`) override the config file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "nvidia-bmm-ccm",
    about = "NVIDIA BMM cloud controller manager",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the TOML cloud-config file.
    #[arg(long, global = true, env = "NVIDIA_BMM_CLOUD_CONFIG")]
    cloud_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the provider name, which interfaces it implements, and the
    /// configured organization, tenant and site when a config is given.
    Info,
    /// Check whether the node's backing instance exists.
    Exists(NodeArgs),
    /// Check whether the node's backing instance is shut down.
    Shutdown(NodeArgs),
    /// Print the node's metadata (addresses, instance type, zone, region) as JSON.
    Metadata(NodeArgs),
    /// Print the zone and region as JSON.
    Zone {
        /// Resolve the zone for this provider ID instead of the local site.
        #[arg(long)]
        provider_id: Option<String>,
    },
}

#[derive(Args)]
struct NodeArgs {
    /// Node name, published as the hostname address.
    #[arg(long)]
    node_name: String,
    /// Provider ID of the node (nvidia-bmm://org/tenant/site/instance-uuid).
    #[arg(long)]
    provider_id: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.cloud_config.as_deref();

    match cli.command {
        Command::Info => commands::info(config),
        Command::Exists(args) => {
            commands::exists(config, &args.node_name, &args.provider_id).await
        }
        Command::Shutdown(args) => {
            commands::shutdown(config, &args.node_name, &args.provider_id).await
        }
        Command::Metadata(args) => {
            commands::metadata(config, &args.node_name, &args.provider_id).await
        }
        Command::Zone { provider_id } => commands::zone(config, provider_id.as_deref()),
    }
}
