//! List the badges a server would discover

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rotabadge_core::{scan_dir, BadgeConfig};
use serde::Serialize;

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Badge directory (env: BADGES_DIR, default: ./badges)
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ListOutput<'a> {
    dir: String,
    count: usize,
    badges: &'a [String],
}

pub fn run_list(args: ListArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| BadgeConfig::from_env().badges_dir);
    let badges = scan_dir(&dir)
        .with_context(|| format!("Failed to list badges in {}", dir.display()))?;

    if args.json {
        let output = ListOutput {
            dir: dir.display().to_string(),
            count: badges.len(),
            badges: &badges,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if badges.is_empty() {
        println!("No .gif or .png badges in {}", dir.display());
        return Ok(());
    }

    for badge in &badges {
        println!("{}", badge);
    }
    Ok(())
}
