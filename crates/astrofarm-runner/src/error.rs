//! Error types for the runner jobs.

use astrofarm_common::CommonError;
use astrofarm_series::SeriesError;
use astrofarm_tiles::TileError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a runner job.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Invalid shared input such as an area of interest.
    #[error("{0}")]
    Common(#[from] CommonError),

    /// Reading the raster or writing tiles failed.
    #[error("Tile preparation failed: {0}")]
    Tiles(#[from] TileError),

    /// Loading parcels or writing series failed.
    #[error("Series generation failed: {0}")]
    Series(#[from] SeriesError),

    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`TilingConfig`](crate::TilingConfig).
    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A setting no pyramid can be written with.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
