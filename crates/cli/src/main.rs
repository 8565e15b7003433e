//! Bottega CLI - catalog and cart tooling.
//!
//! # Usage
//!
//! ```bash
//! # Validate a catalog file
//! bottega-cli catalog check crates/storefront/content/catalog.json
//!
//! # Replay a scripted cart session
//! bottega-cli cart replay --policy append add:p1 add:p1 remove:p1 checkout
//!
//! # Step the product strip for ten seconds at 60 fps
//! bottega-cli scroller preview --speed 1.5 --viewport 960 --frames 600
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Load and validate a catalog
//! - `cart replay` - Run cart operations against a catalog and log each step
//! - `scroller preview` - Step the product strip scroller and report wraps

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bottega_core::{AggregationPolicy, DEFAULT_SCROLL_SPEED};
use clap::{Parser, Subcommand};

mod commands;

/// Catalog used when `--catalog` is not given.
const DEFAULT_CATALOG: &str = "crates/storefront/content/catalog.json";

#[derive(Parser)]
#[command(name = "bottega-cli")]
#[command(author, version, about = "Bottega CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Catalog tools
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Cart tools
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Product strip tools
    Scroller {
        #[command(subcommand)]
        action: ScrollerAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load a catalog and report problems
    Check {
        /// Path to the catalog JSON file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Replay cart operations and log the cart after each one
    Replay {
        /// Path to the catalog JSON file
        #[arg(short, long, default_value = DEFAULT_CATALOG)]
        catalog: PathBuf,

        /// Aggregation policy (`merge` or `append`)
        #[arg(short, long, default_value = "merge")]
        policy: AggregationPolicy,

        /// Operations: `add:<id>`, `remove:<id>`, `toggle`, `checkout`
        #[arg(required = true)]
        ops: Vec<commands::cart::Op>,
    },
}

#[derive(Subcommand)]
enum ScrollerAction {
    /// Step the strip frame by frame and log where it ends up
    Preview {
        /// Path to the catalog JSON file
        #[arg(short, long, default_value = DEFAULT_CATALOG)]
        catalog: PathBuf,

        /// Pixels per frame
        #[arg(short, long, default_value_t = DEFAULT_SCROLL_SPEED)]
        speed: f64,

        /// Visible strip width in pixels
        #[arg(long, default_value_t = 0.0)]
        viewport: f64,

        /// Frames to step
        #[arg(short, long, default_value_t = 600)]
        frames: u32,

        /// Frame at which the pointer starts hovering the strip
        #[arg(long)]
        pause_at: Option<u32>,

        /// How many frames the hover lasts
        #[arg(long, default_value_t = 60)]
        pause_frames: u32,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => {
                commands::catalog::check(&path)?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Replay {
                catalog,
                policy,
                ops,
            } => {
                commands::cart::replay(&catalog, policy, &ops)?;
            }
        },
        Commands::Scroller { action } => match action {
            ScrollerAction::Preview {
                catalog,
                speed,
                viewport,
                frames,
                pause_at,
                pause_frames,
            } => {
                let options = commands::scroller::PreviewOptions {
                    speed,
                    viewport,
                    frames,
                    pause_at,
                    pause_frames,
                };
                commands::scroller::preview(&catalog, &options)?;
            }
        },
    }
    Ok(())
}
