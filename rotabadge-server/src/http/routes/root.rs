//! Informational root endpoint

use axum::{routing::get, Router};

pub const ROOT_TEXT: &str =
    "Rotabadge slot-based badge rotator. Use /badge.gif?slot=1, /badge.gif?slot=2, etc.\n";

/// GET /
async fn root() -> &'static str {
    ROOT_TEXT
}

/// Root routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(root))
}
