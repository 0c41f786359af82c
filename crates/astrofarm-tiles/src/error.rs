//! Error types for the tiles crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading rasters or writing tiles.
#[derive(Debug, Error)]
pub enum TileError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - missing or unusable georeferencing tags.
    #[error("Invalid GeoTIFF {path}: {reason}")]
    InvalidGeoTiff {
        /// File being read.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// The raster is not a single grayscale band.
    #[error("Expected a single-band raster, found color type {0}")]
    NotSingleBand(String),

    /// Sample buffer length does not match the raster dimensions.
    #[error("Raster data has {actual} samples, expected {expected}")]
    DataLength {
        /// width * height.
        expected: usize,
        /// Samples supplied.
        actual: usize,
    },

    /// Encoding or saving a tile image failed.
    #[error("Failed to write tile {path}: {source}")]
    TileWrite {
        /// Destination of the tile.
        path: PathBuf,
        /// Underlying image error.
        #[source]
        source: image::ImageError,
    },

    /// A sampler produced a buffer of the wrong length.
    #[error("Sampler returned {actual} pixels for a {size}x{size} tile")]
    SampleSize {
        /// Tile edge length.
        size: u32,
        /// Pixels actually returned.
        actual: usize,
    },

    /// Invalid zoom level.
    #[error("Invalid zoom level {0} (must be {min}-{max})", min = crate::MIN_ZOOM, max = crate::MAX_ZOOM)]
    InvalidZoomLevel(u8),

    /// Tile coordinate outside the grid for its zoom level.
    #[error("Tile x={x} y={y} is outside the grid at zoom {z}")]
    TileOutOfRange {
        /// Zoom level.
        z: u8,
        /// X tile coordinate.
        x: u32,
        /// Y tile coordinate.
        y: u32,
    },
}
