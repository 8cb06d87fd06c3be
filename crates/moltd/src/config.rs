//! Configuration management for moltd.
//!
//! Loads settings from /etc/molt/config.toml or uses defaults. The path can
//! be overridden with `--config` or the MOLTD_CONFIG environment variable;
//! the variable is also what a respawned agent process inherits, since agents
//! are launched with environment only and no argv.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/molt/config.toml";

/// Environment variable naming an alternate config file
pub const CONFIG_ENV: &str = "MOLTD_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Base URL of the release hub
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Seconds between update checks
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Seconds between agent work units
    #[serde(default = "default_work_interval")]
    pub work_interval_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_check_interval() -> u64 {
    3
}

fn default_work_interval() -> u64 {
    1
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            check_interval_secs: default_check_interval(),
            work_interval_secs: default_work_interval(),
        }
    }
}

impl DaemonConfig {
    /// Resolve the config path: explicit flag, then env var, then default.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        PathBuf::from(CONFIG_PATH)
    }

    /// Load configuration, falling back to defaults when the file is missing
    /// or malformed.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = Self::resolve_path(explicit);
        match fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Invalid config at {}: {}. Using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_values() {
        let config = DaemonConfig::default();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.check_interval_secs, 3);
        assert_eq!(config.work_interval_secs, 1);
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = \"http://hub.internal:9000\"\n").unwrap();

        let config = DaemonConfig::load(Some(&path));
        assert_eq!(config.server_url, "http://hub.internal:9000");
        assert_eq!(config.check_interval_secs, 3);
        assert_eq!(config.work_interval_secs, 1);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "server_url = [not toml").unwrap();

        let config = DaemonConfig::load(Some(&path));
        assert_eq!(config.server_url, "http://localhost:8080");
    }

    #[test]
    fn explicit_path_wins_over_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(DaemonConfig::resolve_path(Some(&path)), path);
    }
}
