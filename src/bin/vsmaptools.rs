//! Export a Vintage Story minimap database as an image
//!
//! Run with: cargo run --bin vsmaptools -- [--config config.json]

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vsmaptools::config::{Config, DEFAULT_CONFIG_PATH};
use vsmaptools::render::{self, DecodePolicy};
use vsmaptools::{output, TileStore};

#[derive(Parser)]
#[command(name = "vsmaptools")]
#[command(version, about = "Render a Vintage Story minimap database to an image")]
struct Args {
    /// JSON config file
    #[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the configured output image
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Render every stored map piece, ignoring configured bounds
    #[arg(long)]
    whole_map: bool,

    /// Worker threads for decoding
    #[arg(long)]
    threads: Option<NonZeroUsize>,

    /// Leave malformed map pieces black instead of failing
    #[arg(long)]
    skip_malformed: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive("info".parse()?)
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_file(&args.config)?;
    if let Some(output) = args.output {
        config.output_path = output;
    }
    config.whole_map |= args.whole_map;
    if let Some(n) = args.threads {
        config.threads = Some(n.get());
    }
    config.skip_malformed |= args.skip_malformed;

    let store = TileStore::open(&config.db_path)?;
    let tiles = store.load()?;
    info!("Loaded {} map pieces from the database.", tiles.len());
    drop(store);

    let options = config.render_options();
    if options.policy == DecodePolicy::SkipMalformed {
        info!("Malformed map pieces will be skipped");
    }

    let canvas = render::run_with(tiles, config.viewport_mode(), &options)?;
    output::save_image(&canvas, &config.output_path)?;

    Ok(())
}
