//! HTTP server command
//!
//! Runs the badge rotator. Flags override the environment, which overrides
//! built-in defaults.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rotabadge_core::BadgeConfig;
use rotabadge_server::run_server;

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Badge directory (env: BADGES_DIR, default: ./badges)
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Port to listen on (env: PORT, default: 8080)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Host to bind (env: ROTABADGE_HOST, default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Seconds between catalog rescans (env: ROTABADGE_REFRESH_SECS, default: 300)
    #[arg(long)]
    pub refresh_secs: Option<u64>,

    /// Selection window in seconds (env: ROTABADGE_WINDOW_SECS, default: 2)
    #[arg(long)]
    pub window_secs: Option<u64>,

    /// Rescan on a timer instead of on the request path
    #[arg(long)]
    pub background_refresh: bool,
}

impl ServeArgs {
    /// Layer flags over `config`
    pub fn apply(self, mut config: BadgeConfig) -> BadgeConfig {
        if let Some(dir) = self.dir {
            config.badges_dir = dir;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(secs) = self.refresh_secs {
            config.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.window_secs {
            config.window = Duration::from_secs(secs.max(1));
        }
        config.background_refresh |= self.background_refresh;
        config
    }
}

/// Run the HTTP server (blocks until shutdown)
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.apply(BadgeConfig::from_env());

    tracing::info!(
        "Starting slot-based badge rotator on {} (serving .gif and .png from {})",
        config.bind_addr(),
        config.badges_dir.display()
    );

    run_server(config).await.context("Server error")?;

    Ok(())
}
