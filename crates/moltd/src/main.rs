//! Molt daemon - self-updating process supervisor.
//!
//! The same binary runs both roles: launched normally it supervises, and
//! re-executed with the MOLTD_AGENT marker set it becomes the supervised
//! worker.

use anyhow::Result;
use clap::Parser;
use moltd::config::{DaemonConfig, CONFIG_ENV};
use moltd::{agent, supervisor, AGENT_ENV};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "moltd")]
#[command(about = "Self-updating process supervisor", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Some(ref path) = cli.config {
        // Respawned agents receive environment only, no argv; export the
        // override so they read the same file.
        std::env::set_var(CONFIG_ENV, path);
    }
    let config = DaemonConfig::load(cli.config.as_deref());

    if std::env::var_os(AGENT_ENV).is_some() {
        agent::run(config).await
    } else {
        supervisor::run(config).await
    }
}
