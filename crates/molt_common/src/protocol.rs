//! Wire types for the release hub API.

use serde::{Deserialize, Serialize};

/// Body of `GET /latest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestResponse {
    pub latest: String,
}

/// Body of `GET /versions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionsResponse {
    pub versions: Vec<String>,
}

/// Body of `GET /ping`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub response: String,
}

/// Error body for non-2xx hub replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
