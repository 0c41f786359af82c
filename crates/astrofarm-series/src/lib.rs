//! # astrofarm-series
//!
//! Synthetic daily time series for farm parcels, plus the parcel fixtures
//! used to drive them.
//!
//! Four metrics are simulated per parcel:
//! - vegetation index (NDVI) with random cloud gaps
//! - soil moisture with a precipitation-driven bump
//! - air temperature with derived min/max
//! - intermittent precipitation events
//!
//! Values are plausible, not physical. All randomness flows through one
//! generator so a seeded run is reproducible end to end.
//!
//! ## Example
//!
//! ```no_run
//! use astrofarm_common::SeedSource;
//! use astrofarm_series::{SeriesGenerator, SeriesWriter};
//!
//! let (rng, _seed) = SeedSource::Fixed(7).into_rng();
//! let mut generator = SeriesGenerator::new(rng, chrono::Local::now().naive_local());
//! let bundle = generator.parcel_bundle("parcel_000", "tomato", 30);
//!
//! let writer = SeriesWriter::new("series")?;
//! writer.write_bundle(&bundle)?;
//! # Ok::<(), astrofarm_series::SeriesError>(())
//! ```

mod bundle;
mod crop;
mod error;
mod generator;
mod parcel;
mod raster_series;
mod writer;

pub use bundle::{BundleMetadata, Metric, ParcelSeriesBundle, SIMULATED_QUALITY};
pub use crop::{CropParams, KNOWN_CROPS};
pub use error::SeriesError;
pub use generator::{
    ndvi_series, precipitation_series, soil_moisture_series, temperature_series, NdviPoint,
    PrecipitationPoint, Quality, SeriesGenerator, SoilMoisturePoint, TemperaturePoint,
    CLOUD_PROBABILITY, DEFAULT_PRECIPITATION_RATE, NDVI_NOISE, SOIL_MOISTURE_NOISE,
    TEMPERATURE_NOISE,
};
pub use parcel::{
    demo_parcels, feature_collection, load_feature_collection, parcel_id, parcels_from_collection,
    synthetic_parcels, Feature, FeatureCollection, Geometry, Parcel, ParcelProperties,
    DEMO_PARCEL_SIZE_DEG, IRRIGATION_METHODS, SOIL_TYPES,
};
pub use raster_series::{raster_parcel_series, RasterParcelSeries, RasterSeriesPoint};
pub use writer::{write_feature_collection, write_raster_series, SeriesWriter};

/// Result type for series operations.
pub type Result<T> = std::result::Result<T, SeriesError>;
