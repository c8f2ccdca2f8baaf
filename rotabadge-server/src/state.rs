//! Application state shared across handlers

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rotabadge_core::{BadgeConfig, CatalogError, CatalogSnapshot, CatalogStore, Selector};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::warn;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Arc<CatalogStore>,
    selector: Selector,
    /// Refresh on the request path; off when a background task owns refreshes
    lazy_refresh: bool,
}

impl AppState {
    pub fn new(config: &BadgeConfig) -> Self {
        let catalog = CatalogStore::new(&config.badges_dir, config.refresh_interval);
        Self::from_parts(
            catalog,
            Selector::new(config.window),
            !config.background_refresh,
        )
    }

    pub fn from_parts(catalog: CatalogStore, selector: Selector, lazy_refresh: bool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog: Arc::new(catalog),
                selector,
                lazy_refresh,
            }),
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    pub fn selector(&self) -> Selector {
        self.inner.selector
    }

    pub fn badges_dir(&self) -> &Path {
        self.inner.catalog.dir()
    }

    /// Rescan the badge directory on the blocking pool
    pub async fn refresh(&self) -> Result<CatalogSnapshot, CatalogError> {
        let store = Arc::clone(&self.inner.catalog);
        tokio::task::spawn_blocking(move || store.refresh())
            .await
            .map_err(|e| {
                warn!(error = %e, "Badge scan task failed");
                CatalogError::Task {
                    reason: e.to_string(),
                }
            })?
    }

    /// Snapshot for a request.
    ///
    /// With lazy refresh the catalog is rescanned once stale. When a background
    /// task owns refreshes, requests still rescan an empty catalog so badges
    /// added after an empty start become visible without waiting a full period.
    pub async fn fresh_catalog(&self) -> CatalogSnapshot {
        let store = Arc::clone(&self.inner.catalog);
        let lazy = self.inner.lazy_refresh;
        let checked = tokio::task::spawn_blocking(move || {
            if lazy {
                store.ensure_fresh()
            } else {
                store.ensure_populated()
            }
        })
        .await;

        match checked {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Badge freshness check failed");
                self.catalog().snapshot()
            }
        }
    }
}

/// Rescan the catalog every `period` until the runtime shuts down.
///
/// The first rescan happens one period after spawning; callers are expected to
/// have run the initial discovery already.
pub fn spawn_refresh_task(state: AppState, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Errors are logged by the store; the previous catalog stays live
            let _ = state.refresh().await;
        }
    })
}
