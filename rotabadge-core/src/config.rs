//! Badge server configuration - paths and environment loading
//!
//! Configuration is loaded from environment variables:
//! - `BADGES_DIR`: directory holding badge images (default: ./badges)
//! - `PORT`: listening port (default: 8080)
//! - `ROTABADGE_HOST`: bind host (default: 0.0.0.0)
//! - `ROTABADGE_REFRESH_SECS`: catalog refresh interval (default: 300)
//! - `ROTABADGE_WINDOW_SECS`: selection window length (default: 2)
//! - `ROTABADGE_BACKGROUND_REFRESH`: rescan on a timer instead of lazily (default: false)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::catalog::DEFAULT_REFRESH_INTERVAL;
use crate::selector::DEFAULT_WINDOW;

pub const DEFAULT_BADGES_DIR: &str = "./badges";
pub const DEFAULT_PORT: u16 = 8080;

/// Badge server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeConfig {
    /// Directory scanned for `.gif` / `.png` badges
    pub badges_dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    /// How old the catalog may get before a request triggers a rescan
    pub refresh_interval: Duration,
    /// Length of one selection window
    pub window: Duration,
    /// Rescan on a timer; requests then only rescan an empty catalog
    pub background_refresh: bool,
}

impl BadgeConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let badges_dir = lookup("BADGES_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.badges_dir);

        let port = parse_or("PORT", lookup("PORT"), defaults.port);
        let host = parse_or("ROTABADGE_HOST", lookup("ROTABADGE_HOST"), defaults.host);
        let refresh_interval = parse_or(
            "ROTABADGE_REFRESH_SECS",
            lookup("ROTABADGE_REFRESH_SECS"),
            defaults.refresh_interval.as_secs(),
        );
        let window = parse_or(
            "ROTABADGE_WINDOW_SECS",
            lookup("ROTABADGE_WINDOW_SECS"),
            defaults.window.as_secs(),
        );
        let background_refresh = lookup("ROTABADGE_BACKGROUND_REFRESH")
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.background_refresh);

        Self {
            badges_dir,
            host,
            port,
            refresh_interval: Duration::from_secs(refresh_interval),
            window: Duration::from_secs(window.max(1)),
            background_refresh,
        }
    }

    /// Create config with explicit badge directory (for testing)
    pub fn with_dir(badges_dir: impl Into<PathBuf>) -> Self {
        Self {
            badges_dir: badges_dir.into(),
            ..Self::default()
        }
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            badges_dir: PathBuf::from(DEFAULT_BADGES_DIR),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            window: DEFAULT_WINDOW,
            background_refresh: false,
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
{
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable config value, using default");
            default
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
