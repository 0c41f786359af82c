//! # astrofarm-tiles
//!
//! Raster-to-tile conversion for AstroFarm map layers.
//!
//! The pipeline is:
//! 1. Read a single-band GeoTIFF ([`Raster::from_file`]).
//! 2. Crop it to an [`AreaOfInterest`](astrofarm_common::AreaOfInterest)
//!    ([`Raster::crop_to_aoi`]).
//! 3. Rescale samples to 0-255 ([`normalize`]).
//! 4. Walk the web tile grid for each zoom level and write one PNG per tile
//!    that strictly intersects the AOI ([`TilePyramid`]).
//!
//! ## Tile Coordinate System
//!
//! Tiles follow the OpenStreetMap Slippy Map naming convention:
//! - `z` is the zoom level
//! - `x` is the column (0 to 2^z - 1, from west to east)
//! - `y` is the row (0 to 2^z - 1, from north to south)
//!
//! The default [`GridScheme::Linear`] divides latitude evenly between
//! ±85.0511°, which is what the published demo tiles were cut with.
//! [`GridScheme::WebMercator`] uses true spherical Mercator rows instead.
//!
//! ## Example
//!
//! ```no_run
//! use astrofarm_common::CENTRAL_VALLEY;
//! use astrofarm_tiles::{normalize, ConstantSampler, GridScheme, Raster, TilePyramid};
//!
//! let raster = Raster::from_file("ndvi.tif")?.crop_to_aoi(&CENTRAL_VALLEY);
//! let normalized = normalize(&raster);
//!
//! let pyramid = TilePyramid::new("tiles", CENTRAL_VALLEY, GridScheme::Linear);
//! let sampler = ConstantSampler::default();
//! for z in [8, 12] {
//!     pyramid.write_zoom(z, &sampler)?;
//! }
//! # let _ = normalized;
//! # Ok::<(), astrofarm_tiles::TileError>(())
//! ```

mod error;
mod grid;
mod normalize;
mod pyramid;
mod raster;
mod sampler;

pub use error::TileError;
pub use grid::{
    GridScheme, TileBounds, TileCoord, TileGrid, LINEAR_LAT_LIMIT, MAX_ZOOM, MIN_ZOOM,
};
pub use normalize::{normalize, NormalizationMethod, NormalizedRaster, MID_GRAY};
pub use pyramid::{PyramidStats, TilePyramid, DEFAULT_TILE_SIZE};
pub use raster::{GeoTransform, PixelWindow, Raster};
pub use sampler::{ConstantSampler, NearestSampler, PixelSampler, PLACEHOLDER_VALUE};

/// Result type for tile operations.
pub type Result<T> = std::result::Result<T, TileError>;
