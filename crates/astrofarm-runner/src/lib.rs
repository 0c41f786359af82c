//! # astrofarm-runner
//!
//! Job orchestration behind the `generate-series` and `prepare-tiles`
//! binaries. Each job takes a plain options struct so it can be driven from
//! tests as well as from the command line.

mod config;
mod error;
mod logging;
mod series_job;
mod tiles_job;

pub use config::{SamplerKind, TilingConfig, DEFAULT_ZOOM_LEVELS};
pub use error::RunnerError;
pub use logging::init_logging;
pub use series_job::{run_generate_series, GenerateSeriesOptions, SeriesSummary};
pub use tiles_job::{run_prepare_tiles, PrepareSummary, PrepareTilesOptions};

/// Default number of days of series per parcel.
pub const DEFAULT_DAYS: u32 = 30;

/// Default number of generated parcels.
pub const DEFAULT_NUM_PARCELS: usize = 10;

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
