//! Molt daemon library - exposes modules for testing.

pub mod agent;
pub mod config;
pub mod installer;
pub mod supervisor;
pub mod update_checker;

/// Environment marker that switches this binary into the agent role.
pub const AGENT_ENV: &str = "MOLTD_AGENT";

/// Version compiled into this binary.
pub const BUILT_VERSION: &str = env!("CARGO_PKG_VERSION");
