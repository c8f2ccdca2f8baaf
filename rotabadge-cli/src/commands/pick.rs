//! Preview which badge each slot gets in a time window

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use rotabadge_core::{scan_dir, BadgeConfig, Selector};
use serde::Serialize;

/// Arguments for the pick command
#[derive(Parser, Debug)]
pub struct PickArgs {
    /// Badge directory (env: BADGES_DIR, default: ./badges)
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Number of slots to show
    #[arg(long, short = 'n', default_value_t = 3)]
    pub slots: u64,

    /// Selection window in seconds (env: ROTABADGE_WINDOW_SECS, default: 2)
    #[arg(long)]
    pub window_secs: Option<u64>,

    /// Unix timestamp to evaluate instead of now
    #[arg(long)]
    pub at: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PickEntry<'a> {
    slot: u64,
    badge: &'a str,
}

#[derive(Serialize)]
struct PickOutput<'a> {
    seed: u64,
    window_secs: u64,
    slots: Vec<PickEntry<'a>>,
}

pub fn run_pick(args: PickArgs) -> Result<()> {
    let config = BadgeConfig::from_env();
    let dir = args.dir.unwrap_or(config.badges_dir);
    let window = args
        .window_secs
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or(config.window);

    let badges = scan_dir(&dir)
        .with_context(|| format!("Failed to list badges in {}", dir.display()))?;

    let selector = Selector::new(window);
    let time = args
        .at
        .map(|secs| UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap_or_else(SystemTime::now);
    let seed = selector.seed_at(time);

    let rotation = selector
        .rotation(&badges, args.slots, seed)
        .with_context(|| format!("No .gif or .png badges in {}", dir.display()))?;

    if args.json {
        let output = PickOutput {
            seed,
            window_secs: window.as_secs(),
            slots: rotation
                .iter()
                .map(|(slot, badge)| PickEntry {
                    slot: slot.get(),
                    badge: *badge,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("seed {} (window {}s)", seed, window.as_secs());
    for (slot, badge) in rotation {
        println!("slot {:>3} -> {}", slot.get(), badge);
    }
    Ok(())
}
