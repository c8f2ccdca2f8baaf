//! Badge catalog - discovery and snapshot caching
//!
//! The catalog is the sorted list of eligible badge filenames found in one
//! directory. It is rebuilt wholesale on refresh and handed out as an
//! immutable, cheaply clonable [`CatalogSnapshot`].
//!
//! Refresh is lazy: [`CatalogStore::ensure_fresh`] rescans only when the
//! snapshot is empty or older than the refresh interval.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// File suffixes (lowercase, without the dot) eligible as badges
pub const ALLOWED_EXTENSIONS: &[&str] = &["gif", "png"];

/// Default time between lazy rescans
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Whether `name` ends in one of [`ALLOWED_EXTENSIONS`], ignoring case.
pub fn is_eligible(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| {
        lower
            .strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

/// Scan `dir` (non-recursively) for eligible badge files.
///
/// Only regular files count; symlinks are followed and kept when they point at
/// a file. Names that are not valid UTF-8 are skipped. The result is sorted by
/// byte value, so `B.gif` sorts before `a.gif`.
pub fn scan_dir(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| CatalogError::scan(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::scan(dir, e))?;
        let file_type = entry.file_type().map_err(|e| CatalogError::scan(dir, e))?;

        let is_file = if file_type.is_symlink() {
            fs::metadata(entry.path()).map(|m| m.is_file()).unwrap_or(false)
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        if is_eligible(&name) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Immutable view of the catalog at one point in time
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    names: Arc<[String]>,
    refreshed_at: Option<Instant>,
}

impl CatalogSnapshot {
    /// Snapshot that has never been refreshed
    pub fn empty() -> Self {
        Self {
            names: Arc::from(Vec::new()),
            refreshed_at: None,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// When this snapshot was built, `None` if never refreshed
    pub fn refreshed_at(&self) -> Option<Instant> {
        self.refreshed_at
    }
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Owned, shareable badge catalog for one directory.
///
/// Reads and swaps go through a single lock that is held only long enough to
/// clone or replace the snapshot pointer. Directory scans run outside it.
#[derive(Debug)]
pub struct CatalogStore {
    dir: PathBuf,
    refresh_interval: Duration,
    current: RwLock<CatalogSnapshot>,
}

impl CatalogStore {
    pub fn new(dir: impl Into<PathBuf>, refresh_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            refresh_interval,
            current: RwLock::new(CatalogSnapshot::empty()),
        }
    }

    /// Badge directory this store scans
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Current snapshot (an `Arc` clone, safe to hold across a refresh)
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Alias for [`snapshot`](Self::snapshot)
    pub fn get(&self) -> CatalogSnapshot {
        self.snapshot()
    }

    /// Rescan the directory and replace the snapshot.
    ///
    /// On failure the previous snapshot and its timestamp are kept, so the
    /// next freshness check retries.
    pub fn refresh(&self) -> Result<CatalogSnapshot> {
        debug!(dir = %self.dir.display(), "Discovering badges");

        let names = match scan_dir(&self.dir) {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "Badge discovery failed, keeping previous catalog");
                return Err(e);
            }
        };

        if names.is_empty() {
            info!(dir = %self.dir.display(), "No .gif or .png badges found");
        } else {
            info!(count = names.len(), badges = ?names, "Discovered badges");
        }

        let snapshot = CatalogSnapshot {
            names: Arc::from(names),
            refreshed_at: Some(Instant::now()),
        };
        self.replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Swap in a new snapshot
    fn replace(&self, snapshot: CatalogSnapshot) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Whether a refresh is due at `now`
    pub fn is_stale_at(&self, now: Instant) -> bool {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            return true;
        }
        match snapshot.refreshed_at {
            Some(at) => now.saturating_duration_since(at) > self.refresh_interval,
            None => true,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    /// Refresh if stale, then return the current snapshot.
    ///
    /// Discovery errors are logged by [`refresh`](Self::refresh) and otherwise
    /// ignored; callers get whatever snapshot survived.
    pub fn ensure_fresh(&self) -> CatalogSnapshot {
        self.refresh_if(self.is_stale())
    }

    /// Refresh only while the catalog is empty, ignoring its age.
    ///
    /// Used when a background task owns periodic rescans but requests must
    /// still be able to populate an empty catalog.
    pub fn ensure_populated(&self) -> CatalogSnapshot {
        self.refresh_if(self.snapshot().is_empty())
    }

    fn refresh_if(&self, due: bool) -> CatalogSnapshot {
        if due {
            if let Ok(snapshot) = self.refresh() {
                return snapshot;
            }
        }
        self.snapshot()
    }
}
