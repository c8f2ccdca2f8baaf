//! Badge endpoint
//!
//! GET /badge.gif?slot=N - serves the badge picked for slot N in the current
//! time window, with headers that stop clients from caching it.

use std::io::ErrorKind;

use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use rotabadge_core::Slot;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{info, warn};

use crate::http::error::ApiError;
use crate::state::AppState;

pub const CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate, public, max-age=0";

/// Content type for a badge file name: PNG by suffix, GIF otherwise
pub fn content_type_for(name: &str) -> &'static str {
    if name.to_lowercase().ends_with(".png") {
        "image/png"
    } else {
        "image/gif"
    }
}

/// Headers every badge response carries.
///
/// Content type is only forced on responses that carry badge bytes (2xx) or
/// describe them (304). Error statuses from the file service keep their own.
fn no_cache_headers(headers: &mut HeaderMap, status: StatusCode, name: &str) {
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    if status.is_success() || status == StatusCode::NOT_MODIFIED {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(name)),
        );
    }
}

/// First `slot` value in the query string, if any
fn slot_param(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "slot")
        .map(|(_, value)| value.as_str())
}

/// GET /badge.gif
async fn badge(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    request: Request,
) -> Result<Response, ApiError> {
    let snapshot = state.fresh_catalog().await;
    if snapshot.is_empty() {
        warn!("No badges available to serve");
        return Err(ApiError::NoBadges);
    }

    let slot = Slot::parse(slot_param(&params));
    let selection = state.selector().select_now(snapshot.names(), slot)?;
    let path = state.badges_dir().join(selection.badge);

    // The catalog may be older than the directory
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(ApiError::FileMissing {
                name: selection.badge.to_string(),
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(badge = %path.display(), "Catalogued badge missing on disk");
            return Err(ApiError::FileMissing {
                name: selection.badge.to_string(),
            });
        }
        Err(e) => return Err(ApiError::Io(e)),
    }

    info!(
        slot = %selection.slot,
        seed = selection.seed,
        badge = %path.display(),
        "Serving badge"
    );

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::FileMissing {
            name: selection.badge.to_string(),
        });
    }

    let mut response = response.map(Body::new);
    let status = response.status();
    no_cache_headers(response.headers_mut(), status, selection.badge);
    Ok(response.into_response())
}

/// Badge routes
pub fn router() -> Router<AppState> {
    Router::new().route("/badge.gif", get(badge))
}
