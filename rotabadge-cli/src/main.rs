//! rotabadge CLI - slot-based rotating badge server
//!
//! Subcommands:
//! - `serve`: run the HTTP server (`/`, `/badge.gif?slot=N`, `/health`)
//! - `list`: show the badges discovered in a directory
//! - `pick`: preview the slot to badge mapping for a time window

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "rotabadge",
    author,
    version,
    about = "Serve a rotating badge picked per slot and time window",
    long_about = "Serve a pseudo-random .gif/.png badge from a directory. Each slot gets a \
                  different badge within a time window, and the assignment reshuffles when \
                  the window rolls over. Responses disable caching so embedded badges rotate."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the badge HTTP server
    Serve(commands::serve::ServeArgs),
    /// List eligible badges in the badge directory
    List(commands::list::ListArgs),
    /// Show which badge each slot gets in a time window
    Pick(commands::pick::PickArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::List(args) => commands::run_list(args)?,
        Commands::Pick(args) => commands::run_pick(args)?,
    }
    Ok(())
}
