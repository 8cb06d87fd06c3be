//! Executable download and atomic replacement.
//!
//! The staged artifact lands in the same directory as the running executable
//! so the final rename never crosses a filesystem.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("download request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status code: {0}")]
    Status(reqwest::StatusCode),

    #[error("staging failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to replace executable with new download; manual intervention needed: {source}")]
    ReplaceFailed {
        #[source]
        source: std::io::Error,
    },
}

impl InstallError {
    /// True when the executable may be half-replaced and the process must not
    /// continue on its own.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ReplaceFailed { .. })
    }
}

/// Downloads release artifacts and swaps them in as the running executable.
pub struct Installer {
    client: reqwest::Client,
    server_url: String,
    exec_path: PathBuf,
    running: Arc<RwLock<String>>,
}

impl Installer {
    pub fn new(
        client: reqwest::Client,
        server_url: String,
        exec_path: PathBuf,
        running: Arc<RwLock<String>>,
    ) -> Self {
        Self {
            client,
            server_url,
            exec_path,
            running,
        }
    }

    /// Download `version` from the hub and install it at the executable's
    /// canonical path. On success the running-version record advances.
    pub async fn install(&self, version: &str) -> Result<(), InstallError> {
        let url = format!("{}/download/{}", self.server_url, version);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(InstallError::Status(resp.status()));
        }
        let bytes = resp.bytes().await?;

        let staged = self.exec_path.with_file_name(version);
        tokio::fs::write(&staged, &bytes).await?;
        tokio::fs::set_permissions(&staged, fs::Permissions::from_mode(0o755)).await?;
        info!("Downloaded updated version");

        replace_executable(&self.exec_path, &staged)?;

        let mut running = self.running.write().await;
        *running = version.to_string();
        info!("Updated running version to {}", version);
        Ok(())
    }
}

/// Two-step swap: back the current executable up as `<name>.old`, then move
/// the staged artifact onto the canonical path.
///
/// A failed first rename leaves the system on the old version. A failed
/// second rename is fatal: the canonical path has already been vacated and no
/// automatic repair is attempted.
pub fn replace_executable(exec: &Path, staged: &Path) -> Result<(), InstallError> {
    let backup = backup_path(exec);
    fs::rename(exec, &backup)?;
    fs::rename(staged, exec).map_err(|source| InstallError::ReplaceFailed { source })?;
    Ok(())
}

/// `<name>.old` beside the executable.
pub fn backup_path(exec: &Path) -> PathBuf {
    let name = exec.file_name().unwrap_or_default().to_string_lossy();
    exec.with_file_name(format!("{}.old", name))
}
