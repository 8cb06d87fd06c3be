//! Supervisor role: owns the agent subprocess and the update checker.
//!
//! One select loop multiplexes everything that can change the process
//! lifecycle: termination signals, the child exiting, and a staged update
//! becoming ready. Events are handled one at a time, and a new agent is
//! never spawned before the previous one's exit has been observed.

use crate::config::DaemonConfig;
use crate::update_checker::UpdateChecker;
use crate::{AGENT_ENV, BUILT_VERSION};
use anyhow::{Context, Result};
use molt_common::version;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::process::ExitStatus;
use std::sync::Arc;
use tokio::process::{Child, Command};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{error, info, warn};

enum Event {
    /// Termination signal observed; forward it and shut down.
    Terminate(Signal),
    /// The agent exited on its own.
    Exited(std::io::Result<ExitStatus>),
    /// A new executable is staged; restart the agent into it.
    Reload,
}

pub async fn run(config: DaemonConfig) -> Result<()> {
    info!(
        version = version::normalize(BUILT_VERSION),
        pid = std::process::id(),
        "Starting supervisor"
    );

    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    // Capacity 1: at most one reload may ever be pending.
    let (reload_tx, mut reload_rx) = mpsc::channel::<()>(1);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let running = Arc::new(RwLock::new(version::normalize(BUILT_VERSION).to_string()));
    let exec_path = std::env::current_exe().context("Failed to resolve own executable path")?;
    let checker = UpdateChecker::new(&config, exec_path, running, reload_tx);
    let checker_task = tokio::spawn(checker.run(shutdown_rx));

    let outcome = loop {
        info!("Starting agent");
        let mut child = match spawn_agent() {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to start agent: {:#}", e);
                break Err(e);
            }
        };
        let pid = child.id().map(|id| Pid::from_raw(id as i32));

        let event = tokio::select! {
            _ = sigint.recv() => Event::Terminate(Signal::SIGINT),
            _ = sigterm.recv() => Event::Terminate(Signal::SIGTERM),
            status = child.wait() => Event::Exited(status),
            _ = reload_rx.recv() => Event::Reload,
        };

        match event {
            Event::Terminate(sig) => {
                info!("Signal received: {}. Passing through to agent first", sig);
                forward(pid, sig);
                let _ = child.wait().await;
                break Ok(());
            }
            Event::Exited(status) => {
                match status {
                    Ok(status) if status.success() => info!("Agent exited cleanly"),
                    Ok(status) => warn!("Agent exited with {}", status),
                    Err(e) => warn!("Agent exited with error: {}", e),
                }
                info!("Agent exited outside of the supervisor, restarting");
            }
            Event::Reload => {
                info!("Update completed, restarting agent");
                forward(pid, Signal::SIGHUP);
                let _ = child.wait().await;
            }
        }
    };

    let _ = shutdown_tx.send(true);
    if let Err(e) = checker_task.await {
        warn!("Update checker task failed: {}", e);
    }
    info!("Exiting all");
    outcome
}

/// Re-exec this binary in the agent role. The child inherits the environment
/// plus the role marker; stdio stays attached to the supervisor's.
fn spawn_agent() -> Result<Child> {
    let exe = std::env::current_exe().context("Failed to resolve own executable path")?;
    Command::new(&exe)
        .env(AGENT_ENV, "1")
        .kill_on_drop(true)
        .spawn()
        .context("Failed to start agent process")
}

fn forward(pid: Option<Pid>, sig: Signal) {
    let Some(pid) = pid else {
        warn!("Agent pid unknown, not forwarding {}", sig);
        return;
    };
    if let Err(e) = kill(pid, sig) {
        warn!("Failed to forward {} to agent: {}", sig, e);
    }
}
