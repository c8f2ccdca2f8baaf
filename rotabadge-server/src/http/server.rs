//! Axum server setup
//!
//! Server skeleton with:
//! - Initial badge discovery before binding
//! - Optional background catalog refresh
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;

use axum::Router;
use rotabadge_core::BadgeConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::state::{spawn_refresh_task, AppState};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::root::router())
        .merge(routes::health::router())
        .merge(routes::badge::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// Only a bind failure is fatal; discovery errors are logged and the server
/// starts with whatever catalog it has.
///
/// # Example
///
/// ```ignore
/// let config = BadgeConfig::from_env();
/// run_server(config).await?;
/// ```
pub async fn run_server(config: BadgeConfig) -> Result<(), ServerError> {
    let state = AppState::new(&config);
    tracing::info!(
        badges_dir = %config.badges_dir.display(),
        refresh_secs = config.refresh_interval.as_secs(),
        window_secs = config.window.as_secs(),
        background_refresh = config.background_refresh,
        "Badge config loaded"
    );

    // Errors are already logged by the store
    let _ = state.refresh().await;

    let refresher = config
        .background_refresh
        .then(|| spawn_refresh_task(state.clone(), config.refresh_interval));

    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    tracing::info!("Badge server listening on {}", addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = refresher {
        handle.abort();
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use rotabadge_core::{CatalogStore, Selector};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    // Long enough that two requests in one test share a seed
    const WIDE_WINDOW: Duration = Duration::from_secs(1_000_000_000);

    fn app_for(dir: &Path) -> (Router, AppState) {
        let state = AppState::from_parts(
            CatalogStore::new(dir, Duration::from_secs(300)),
            Selector::new(WIDE_WINDOW),
            true,
        );
        (build_router(state.clone()), state)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    fn write_badges(dir: &Path) {
        fs::write(dir.join("a.gif"), b"GIF89a-a").unwrap();
        fs::write(dir.join("b.png"), b"\x89PNG-b").unwrap();
        fs::write(dir.join("c.GIF"), b"GIF89a-c").unwrap();
        fs::write(dir.join("notes.txt"), b"not a badge").unwrap();
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let tmp = TempDir::new().unwrap();
        let (app, _) = app_for(tmp.path());

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.contains("/badge.gif?slot=1"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let tmp = TempDir::new().unwrap();
        let (app, _) = app_for(tmp.path());

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.starts_with(r#"{"status":"ok","version":""#));
        assert!(body.ends_with(r#""badges":0}"#));
    }

    #[tokio::test]
    async fn test_badge_headers_and_body() {
        let tmp = TempDir::new().unwrap();
        write_badges(tmp.path());
        let (app, _) = app_for(tmp.path());

        let response = app.oneshot(get("/badge.gif?slot=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers().clone();
        assert_eq!(
            headers[header::CACHE_CONTROL],
            "no-cache, no-store, must-revalidate, public, max-age=0"
        );
        assert_eq!(headers[header::PRAGMA], "no-cache");
        assert_eq!(headers[header::EXPIRES], "0");

        let body = body_bytes(response).await;
        let content_type = headers[header::CONTENT_TYPE].to_str().unwrap();
        if body.starts_with(b"\x89PNG") {
            assert_eq!(content_type, "image/png");
            assert_eq!(body, b"\x89PNG-b");
        } else {
            assert_eq!(content_type, "image/gif");
            assert!(body == b"GIF89a-a" || body == b"GIF89a-c");
        }
    }

    #[tokio::test]
    async fn test_slot_four_wraps_to_slot_one() {
        let tmp = TempDir::new().unwrap();
        write_badges(tmp.path());
        let (app, _) = app_for(tmp.path());

        let one = app.clone().oneshot(get("/badge.gif?slot=1")).await.unwrap();
        let four = app.clone().oneshot(get("/badge.gif?slot=4")).await.unwrap();

        assert_eq!(body_bytes(one).await, body_bytes(four).await);
    }

    #[tokio::test]
    async fn test_slots_cover_every_badge() {
        let tmp = TempDir::new().unwrap();
        write_badges(tmp.path());
        let (app, _) = app_for(tmp.path());

        let mut bodies = Vec::new();
        for slot in 1..=3 {
            let uri = format!("/badge.gif?slot={slot}");
            let response = app.clone().oneshot(get(&uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            bodies.push(body_bytes(response).await);
        }
        bodies.sort();
        bodies.dedup();
        assert_eq!(bodies.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_slot_defaults_to_first() {
        let tmp = TempDir::new().unwrap();
        write_badges(tmp.path());
        let (app, _) = app_for(tmp.path());

        let first = body_bytes(app.clone().oneshot(get("/badge.gif?slot=1")).await.unwrap()).await;
        for uri in ["/badge.gif", "/badge.gif?slot=abc", "/badge.gif?slot=0", "/badge.gif?slot=-2"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(body_bytes(response).await, first, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_empty_directory_is_404() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("readme.md"), b"no badges here").unwrap();
        let (app, _) = app_for(tmp.path());

        let response = app.oneshot(get("/badge.gif?slot=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"No badges available");
    }

    #[tokio::test]
    async fn test_missing_directory_is_404() {
        let tmp = TempDir::new().unwrap();
        let (app, _) = app_for(&tmp.path().join("missing"));

        let response = app.oneshot(get("/badge.gif")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deleted_badge_is_404_naming_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("only.gif"), b"GIF89a").unwrap();
        let (app, state) = app_for(tmp.path());

        state.refresh().await.unwrap();
        fs::remove_file(tmp.path().join("only.gif")).unwrap();

        let response = app.oneshot(get("/badge.gif?slot=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.contains("only.gif"));
    }

    #[tokio::test]
    async fn test_png_content_type() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("solo.PNG"), b"\x89PNG").unwrap();
        let (app, _) = app_for(tmp.path());

        let response = app.oneshot(get("/badge.gif?slot=7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }

    fn ranged(range: &'static str) -> Request<Body> {
        Request::builder()
            .uri("/badge.gif?slot=1")
            .header(header::RANGE, range)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_partial_range_keeps_badge_content_type() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.gif"), b"GIF89a-a").unwrap();
        let (app, _) = app_for(tmp.path());

        let response = app.oneshot(ranged("bytes=0-2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/gif");
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
        assert_eq!(body_bytes(response).await, b"GIF");
    }

    #[tokio::test]
    async fn test_unsatisfiable_range_is_not_labelled_as_image() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.gif"), b"GIF89a-a").unwrap();
        let (app, _) = app_for(tmp.path());

        let response = app.oneshot(ranged("bytes=100-200")).await.unwrap();
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_ne!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/gif")
        );
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "no-cache, no-store, must-revalidate, public, max-age=0"
        );
    }
}

