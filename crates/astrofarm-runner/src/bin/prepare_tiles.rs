//! Prepare raster tiles, demo parcels and parcel series for AstroFarm.

use astrofarm_common::{AreaOfInterest, SeedSource};
use astrofarm_runner::{
    init_logging, run_prepare_tiles, PrepareTilesOptions, SamplerKind, TilingConfig,
    DEFAULT_DAYS, DEFAULT_NUM_PARCELS,
};
use astrofarm_tiles::GridScheme;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Prepare NASA data for AstroFarm
#[derive(Parser, Debug)]
#[command(name = "prepare-tiles", version, about)]
struct Args {
    /// Input GeoTIFF file
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    output: Option<PathBuf>,

    /// Parcels GeoJSON file; writes per-parcel series instead of tiles
    #[arg(long)]
    parcels: Option<PathBuf>,

    /// Create a demo parcels file at this path
    #[arg(long)]
    create_parcels: Option<PathBuf>,

    /// Zoom levels to generate [default: 8 12]
    #[arg(long, num_args = 1..)]
    zoom_levels: Option<Vec<u8>>,

    /// Number of demo parcels to create
    #[arg(long, default_value_t = DEFAULT_NUM_PARCELS)]
    num_parcels: usize,

    /// Days of series per parcel
    #[arg(long, default_value_t = DEFAULT_DAYS)]
    days: u32,

    /// Area of interest as west,south,east,north
    #[arg(long, allow_hyphen_values = true)]
    aoi: Option<AreaOfInterest>,

    /// YAML tiling config; other flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tile grid: linear or web-mercator
    #[arg(long)]
    grid: Option<GridScheme>,

    /// Pixel sampler filling each tile
    #[arg(long, value_enum)]
    sampler: Option<SamplerKind>,

    /// Tile edge length in pixels
    #[arg(long)]
    tile_size: Option<u32>,

    /// Random seed; drawn from the OS and logged when omitted
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn tiling_config(&self) -> astrofarm_runner::Result<TilingConfig> {
        let mut config = TilingConfig::load(self.config.as_deref())?;
        if let Some(aoi) = self.aoi {
            config.aoi = aoi;
        }
        if let Some(zoom_levels) = &self.zoom_levels {
            config.zoom_levels = zoom_levels.clone();
        }
        if let Some(grid) = self.grid {
            config.grid = grid;
        }
        if let Some(sampler) = self.sampler {
            config.sampler = sampler;
        }
        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        Ok(config)
    }
}

fn run(args: Args) -> astrofarm_runner::Result<()> {
    let options = PrepareTilesOptions {
        config: args.tiling_config()?,
        input: args.input,
        output: args.output,
        parcels: args.parcels,
        create_parcels: args.create_parcels,
        num_parcels: args.num_parcels,
        days: args.days,
        seed: SeedSource::from_option(args.seed),
    };
    run_prepare_tiles(&options)?;
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
