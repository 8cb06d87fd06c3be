//! Periodic update checks against the release hub.
//!
//! Each tick is one independent attempt: query the latest published version,
//! compare it with the running version, and drive the installer when the hub
//! is ahead. Failures are logged and the next tick retries from scratch.

use crate::config::DaemonConfig;
use crate::installer::Installer;
use anyhow::{bail, Context, Result};
use molt_common::protocol::LatestResponse;
use molt_common::version;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

pub struct UpdateChecker {
    client: reqwest::Client,
    server_url: String,
    interval: Duration,
    running: Arc<RwLock<String>>,
    installer: Installer,
    reload_tx: mpsc::Sender<()>,
}

impl UpdateChecker {
    /// Build the checker and the installer it drives. `exec_path` is the
    /// canonical path the installer swaps new binaries into.
    pub fn new(
        config: &DaemonConfig,
        exec_path: PathBuf,
        running: Arc<RwLock<String>>,
        reload_tx: mpsc::Sender<()>,
    ) -> Self {
        let client = reqwest::Client::new();
        let installer = Installer::new(
            client.clone(),
            config.server_url.clone(),
            exec_path,
            running.clone(),
        );
        Self {
            client,
            server_url: config.server_url.clone(),
            interval: Duration::from_secs(config.check_interval_secs),
            running,
            installer,
            reload_tx,
        }
    }

    /// Run until `shutdown` flips, checking once per interval.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Update checker done");
                    return;
                }
                _ = ticker.tick() => {
                    debug!("Checking for update");
                    self.tick().await;
                }
            }
        }
    }

    async fn tick(&self) {
        let candidate = match self.check_once().await {
            Ok(Some(version)) => version,
            Ok(None) => return,
            Err(e) => {
                error!("Update check failed: {:#}", e);
                return;
            }
        };

        match self.installer.install(&candidate).await {
            Ok(()) => self.notify_reload(),
            Err(e) if e.is_fatal() => {
                error!("Unrecoverable update failure: {}. Stopping", e);
                std::process::exit(1);
            }
            Err(e) => error!("Error downloading update: {}", e),
        }
    }

    /// Query the hub for the latest published version. Returns the candidate
    /// only when it is strictly newer than the running version.
    pub async fn check_once(&self) -> Result<Option<String>> {
        let url = format!("{}/latest", self.server_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to GET /latest")?;
        if !resp.status().is_success() {
            bail!("unexpected status code: {}", resp.status());
        }
        let body: LatestResponse = resp
            .json()
            .await
            .context("Failed to parse hub response")?;

        let latest = version::normalize(&body.latest).to_string();
        debug!("Latest version available: {}", latest);

        let running = self.running.read().await;
        if version::is_newer(&latest, running.as_str()) {
            info!("📦  New version available: {} -> {}", running.as_str(), latest);
            Ok(Some(latest))
        } else {
            Ok(None)
        }
    }

    fn notify_reload(&self) {
        notify_reload(&self.reload_tx);
    }
}

/// Emit a reload event without blocking. A reload already pending means the
/// supervisor will restart into the new image anyway, so the event is
/// dropped rather than queued.
pub fn notify_reload(tx: &mpsc::Sender<()>) {
    match tx.try_send(()) {
        Ok(()) => info!("Reloading agent"),
        Err(mpsc::error::TrySendError::Full(())) => info!("Reload already in progress"),
        Err(mpsc::error::TrySendError::Closed(())) => debug!("Reload channel closed"),
    }
}
