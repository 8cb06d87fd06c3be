//! Shared building blocks for the molt daemon and release hub.

pub mod protocol;
pub mod version;

pub use protocol::{ErrorResponse, LatestResponse, PingResponse, VersionsResponse};
