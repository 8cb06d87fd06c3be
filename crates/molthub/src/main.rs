//! Release hub - serves released molt binaries for download.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "molthub")]
#[command(about = "Release hub for molt binaries", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory of released binaries, one file per version
    #[arg(long, default_value = "/dist")]
    root: PathBuf,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting release hub");

    let listener = TcpListener::bind(&cli.listen).await?;
    molthub::serve(listener, cli.root).await
}
