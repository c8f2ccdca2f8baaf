//! HTTP server layer
//!
//! Axum server with:
//! - Root info, badge, and health routes
//! - Request tracing
//! - Graceful shutdown

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerError};
