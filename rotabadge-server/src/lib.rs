//! rotabadge-server: HTTP surface for the badge rotator
//!
//! Serves `/badge.gif?slot=N` from a lazily refreshed badge catalog, plus an
//! informational root and a health check.

pub mod http;
pub mod state;

pub use http::{build_router, run_server, ApiError, ServerError};
pub use state::{spawn_refresh_task, AppState};
