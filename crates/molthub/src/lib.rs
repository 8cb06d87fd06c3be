//! Release hub library - exposes the router for in-process testing.

pub mod routes;
pub mod server;

pub use server::{router, serve, AppState};
