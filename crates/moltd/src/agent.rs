//! Agent role: the supervised worker process.
//!
//! Stays responsive to signals while doing its work, and polls for loss of
//! its supervisor between work units. Detection latency for an orphaned
//! agent is bounded by the work interval.

use crate::config::DaemonConfig;
use crate::BUILT_VERSION;
use anyhow::{Context, Result};
use molt_common::version;
use nix::unistd::{getppid, Pid};
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::sleep;
use tracing::{error, info};

pub async fn run(config: DaemonConfig) -> Result<()> {
    info!(
        version = version::normalize(BUILT_VERSION),
        pid = std::process::id(),
        "Starting agent"
    );

    let supervisor_pid = getppid();
    let work_interval = Duration::from_secs(config.work_interval_secs);

    let mut sighup = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    loop {
        tokio::select! {
            _ = sighup.recv() => {
                // SIGHUP comes from the supervisor for a planned restart.
                info!("Received signal from supervisor, shutting down");
                std::process::exit(0);
            }
            _ = sigint.recv() => {
                error!("Received SIGINT, shutting down");
                std::process::exit(1);
            }
            _ = sigterm.recv() => {
                error!("Received SIGTERM, shutting down");
                std::process::exit(1);
            }
            _ = sleep(work_interval) => {
                if orphaned(supervisor_pid) {
                    error!("Supervisor pid is gone, shutting down");
                    std::process::exit(1);
                }
                info!("Working");
            }
        }
    }
}

/// The supervisor died when the parent pid no longer matches the pid
/// captured at startup.
pub fn orphaned(supervisor_pid: Pid) -> bool {
    getppid() != supervisor_pid
}
