//! The per-parcel collection of all four series.

use crate::{NdviPoint, PrecipitationPoint, SoilMoisturePoint, TemperaturePoint};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of [`BundleMetadata::data_quality`] for generated bundles.
pub const SIMULATED_QUALITY: &str = "simulated";

/// A simulated metric, each written to its own subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Ndvi,
    SoilMoisture,
    Temperature,
    Precipitation,
}

impl Metric {
    /// Every metric, in output order.
    pub const ALL: [Metric; 4] = [
        Metric::Ndvi,
        Metric::SoilMoisture,
        Metric::Temperature,
        Metric::Precipitation,
    ];

    /// Name of the metric's output subdirectory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Metric::Ndvi => "ndvi",
            Metric::SoilMoisture => "soil_moisture",
            Metric::Temperature => "temperature",
            Metric::Precipitation => "precipitation",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Provenance attached to a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub generated_at: NaiveDateTime,
    pub days: u32,
    pub crop_type: String,
    pub data_quality: String,
}

/// All series for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelSeriesBundle {
    pub parcel_id: String,
    pub crop_type: String,
    pub ndvi: Vec<NdviPoint>,
    pub soil_moisture: Vec<SoilMoisturePoint>,
    pub temperature: Vec<TemperaturePoint>,
    pub precipitation: Vec<PrecipitationPoint>,
    pub metadata: BundleMetadata,
}

impl ParcelSeriesBundle {
    /// Assemble a bundle; `days` in the metadata is taken from the NDVI series.
    pub fn new(
        parcel_id: impl Into<String>,
        crop_type: impl Into<String>,
        generated_at: NaiveDateTime,
        ndvi: Vec<NdviPoint>,
        soil_moisture: Vec<SoilMoisturePoint>,
        temperature: Vec<TemperaturePoint>,
        precipitation: Vec<PrecipitationPoint>,
    ) -> Self {
        let crop_type = crop_type.into();
        let metadata = BundleMetadata {
            generated_at,
            days: ndvi.len() as u32,
            crop_type: crop_type.clone(),
            data_quality: SIMULATED_QUALITY.to_string(),
        };
        Self {
            parcel_id: parcel_id.into(),
            crop_type,
            ndvi,
            soil_moisture,
            temperature,
            precipitation,
            metadata,
        }
    }

    /// Number of records in the given metric's series.
    pub fn len_of(&self, metric: Metric) -> usize {
        match metric {
            Metric::Ndvi => self.ndvi.len(),
            Metric::SoilMoisture => self.soil_moisture.len(),
            Metric::Temperature => self.temperature.len(),
            Metric::Precipitation => self.precipitation.len(),
        }
    }
}
