//! Vegetation series keyed by feature position rather than parcel id.
//!
//! Used alongside tile preparation, where the parcels file may come from
//! elsewhere and carry no usable identifiers.

use crate::{parcel_id, FeatureCollection, Geometry, ParcelProperties, Quality};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One day of a raster-keyed series. Cloudy days still carry a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterSeriesPoint {
    pub day: u32,
    pub value: f64,
    pub quality: Quality,
}

/// Series for the feature at one position of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterParcelSeries {
    pub parcel_id: String,
    pub geometry: Option<Geometry>,
    pub properties: ParcelProperties,
    pub time_series: Vec<RasterSeriesPoint>,
}

/// One series per feature, ids `parcel_000`, `parcel_001`, ... in order.
pub fn raster_parcel_series<R: Rng + ?Sized>(
    rng: &mut R,
    collection: &FeatureCollection,
    days: u32,
) -> Vec<RasterParcelSeries> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            let time_series = (0..days)
                .map(|day| {
                    let base = 0.5 + rng.sample::<f64, _>(StandardNormal) * 0.1;
                    let monthly = 0.1 * (2.0 * PI * day as f64 / 30.0).sin();
                    let noise = rng.sample::<f64, _>(StandardNormal) * 0.05;
                    let quality = if rng.gen::<f64>() > 0.2 {
                        Quality::Good
                    } else {
                        Quality::Cloudy
                    };
                    RasterSeriesPoint {
                        day,
                        value: (base + monthly + noise).clamp(0.0, 1.0),
                        quality,
                    }
                })
                .collect();

            RasterParcelSeries {
                parcel_id: parcel_id(i),
                geometry: feature.geometry.clone(),
                properties: feature.properties.clone(),
                time_series,
            }
        })
        .collect()
}
