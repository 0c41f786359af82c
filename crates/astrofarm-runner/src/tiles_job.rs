//! The `prepare-tiles` job: demo parcels, raster-keyed series, or a tile
//! pyramid, depending on which inputs are given.

use crate::{Result, SamplerKind, TilingConfig, DEFAULT_DAYS, DEFAULT_NUM_PARCELS};
use astrofarm_common::{SeedSource, SimRng};
use astrofarm_series::{
    demo_parcels, feature_collection, load_feature_collection, raster_parcel_series,
    write_feature_collection, write_raster_series,
};
use astrofarm_tiles::{
    normalize, ConstantSampler, NearestSampler, PixelSampler, PyramidStats, Raster, TilePyramid,
};
use std::path::{Path, PathBuf};

/// Inputs of a `prepare-tiles` run.
#[derive(Debug, Clone)]
pub struct PrepareTilesOptions {
    /// Source GeoTIFF.
    pub input: Option<PathBuf>,
    /// Tile or series output directory.
    pub output: Option<PathBuf>,
    /// Parcels file; switches the run from tiles to raster-keyed series.
    pub parcels: Option<PathBuf>,
    /// Where to write a demo parcels file.
    pub create_parcels: Option<PathBuf>,
    pub num_parcels: usize,
    pub days: u32,
    pub config: TilingConfig,
    pub seed: SeedSource,
}

impl Default for PrepareTilesOptions {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            parcels: None,
            create_parcels: None,
            num_parcels: DEFAULT_NUM_PARCELS,
            days: DEFAULT_DAYS,
            config: TilingConfig::default(),
            seed: SeedSource::Entropy,
        }
    }
}

/// What a `prepare-tiles` run produced. All `None` when there was nothing
/// to do.
#[derive(Debug, Clone, Default)]
pub struct PrepareSummary {
    pub parcels_file: Option<PathBuf>,
    pub series_files: Option<Vec<PathBuf>>,
    pub tiles: Option<PyramidStats>,
}

impl PrepareSummary {
    /// True if no step ran.
    pub fn is_empty(&self) -> bool {
        self.parcels_file.is_none() && self.series_files.is_none() && self.tiles.is_none()
    }
}

/// Run every step the options ask for. Missing input combinations are
/// logged and skipped.
pub fn run_prepare_tiles(options: &PrepareTilesOptions) -> Result<PrepareSummary> {
    options.config.validate()?;
    let (mut rng, _seed) = options.seed.into_rng();
    let mut summary = PrepareSummary::default();

    if let Some(path) = &options.create_parcels {
        create_demo_parcels(&mut rng, options, path)?;
        summary.parcels_file = Some(path.clone());
    }

    match (&options.input, &options.output) {
        (Some(input), Some(output)) => match &options.parcels {
            Some(parcels) => {
                let files = create_series(&mut rng, input, parcels, output, options.days)?;
                summary.series_files = Some(files);
            }
            None => {
                summary.tiles = Some(create_tiles(input, output, &options.config)?);
            }
        },
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!("Both --input and --output are needed to prepare tiles or series");
        }
        (None, None) => {}
    }

    if summary.is_empty() {
        tracing::info!("Nothing to do: pass --create-parcels, or --input with --output");
    }
    Ok(summary)
}

fn create_demo_parcels(
    rng: &mut SimRng,
    options: &PrepareTilesOptions,
    path: &Path,
) -> Result<()> {
    let parcels = demo_parcels(rng, &options.config.aoi, options.num_parcels);
    write_feature_collection(path, &feature_collection(&parcels))?;
    Ok(())
}

fn create_series(
    rng: &mut SimRng,
    input: &Path,
    parcels: &Path,
    output: &Path,
    days: u32,
) -> Result<Vec<PathBuf>> {
    tracing::info!(
        input = %input.display(),
        parcels = %parcels.display(),
        "Creating series data"
    );

    let raster = Raster::from_file(input)?;
    let (width, height) = raster.dimensions();
    tracing::debug!(width, height, "Opened source raster");

    let collection = load_feature_collection(parcels)?;
    let mut files = Vec::with_capacity(collection.features.len());
    for series in raster_parcel_series(rng, &collection, days) {
        files.push(write_raster_series(output, &series)?);
    }

    tracing::info!(parcels = files.len(), output = %output.display(), "Created series data");
    Ok(files)
}

fn create_tiles(input: &Path, output: &Path, config: &TilingConfig) -> Result<PyramidStats> {
    tracing::info!(input = %input.display(), aoi = %config.aoi, "Creating tiles");

    let raster = Raster::from_file(input)?.crop_to_aoi(&config.aoi);
    let normalized = normalize(&raster);
    let (width, height) = normalized.dimensions();
    tracing::info!(width, height, method = ?normalized.method(), "Normalized raster");

    let sampler: Box<dyn PixelSampler + '_> = match config.sampler {
        SamplerKind::Constant => Box::new(ConstantSampler::new(config.fill_value)),
        SamplerKind::Nearest => Box::new(NearestSampler::new(&normalized)),
    };

    let pyramid =
        TilePyramid::new(output, config.aoi, config.grid).with_tile_size(config.tile_size);
    let stats = pyramid.write_levels(&config.zoom_levels, sampler.as_ref())?;

    tracing::info!(
        tiles = stats.total(),
        output = %output.display(),
        grid = %config.grid,
        "Tile generation complete"
    );
    Ok(stats)
}
