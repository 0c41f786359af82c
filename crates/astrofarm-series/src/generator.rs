//! Daily series for the four simulated metrics.
//!
//! Each `*_series` function takes the random source explicitly so callers can
//! share one seeded generator across parcels. [`SeriesGenerator`] bundles the
//! source with a fixed reference time.

use crate::{CropParams, ParcelSeriesBundle};
use astrofarm_common::SimRng;
use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use rand_distr::{Exp1, StandardNormal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Standard deviation of the vegetation index noise.
pub const NDVI_NOISE: f64 = 0.1;

/// Standard deviation of the soil moisture noise.
pub const SOIL_MOISTURE_NOISE: f64 = 0.05;

/// Standard deviation of the temperature noise in °C.
pub const TEMPERATURE_NOISE: f64 = 2.0;

/// Daily chance of a precipitation event.
pub const DEFAULT_PRECIPITATION_RATE: f64 = 0.1;

/// Daily chance of a cloud-obscured vegetation reading.
pub const CLOUD_PROBABILITY: f64 = 0.2;

/// Mean daily precipitation feeding the soil moisture model, in mm.
const SOIL_PRECIPITATION_MEAN: f64 = 2.0;

/// Mean intensity of a precipitation event, in mm.
const PRECIPITATION_INTENSITY_MEAN: f64 = 5.0;

/// Observation quality of a vegetation reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Cloudy,
}

/// One vegetation index observation. `value` is `None` when cloudy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviPoint {
    pub day: u32,
    pub value: Option<f64>,
    pub quality: Quality,
    pub date: NaiveDateTime,
}

/// One soil moisture observation with the precipitation that drove it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilMoisturePoint {
    pub day: u32,
    pub value: f64,
    pub precipitation: f64,
    pub date: NaiveDateTime,
}

/// One temperature observation in °C.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    pub day: u32,
    pub value: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub date: NaiveDateTime,
}

/// One day of precipitation. Both fields are zero on dry days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationPoint {
    pub day: u32,
    pub value: f64,
    pub duration_hours: u32,
    pub date: NaiveDateTime,
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    rng.sample::<f64, _>(StandardNormal) * std_dev
}

fn exponential<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> f64 {
    rng.sample::<f64, _>(Exp1) * mean
}

/// Seasonal phase of a day of the year, in radians.
fn seasonal(day: u32) -> f64 {
    2.0 * PI * day as f64 / 365.0
}

fn date_of(reference_time: NaiveDateTime, day: u32, days: u32) -> NaiveDateTime {
    reference_time - Duration::days(i64::from(days - day))
}

/// Vegetation index series around `base`.
pub fn ndvi_series<R: Rng + ?Sized>(
    rng: &mut R,
    reference_time: NaiveDateTime,
    days: u32,
    base: f64,
    noise_level: f64,
) -> Vec<NdviPoint> {
    (0..days)
        .map(|day| {
            let trend = 0.1 * (day as f64 / days as f64);
            let value = base + 0.2 * seasonal(day).sin() + trend + gaussian(rng, noise_level);
            let value = value.clamp(0.0, 1.0);

            let cloudy = rng.gen::<f64>() < CLOUD_PROBABILITY;
            NdviPoint {
                day,
                value: (!cloudy).then_some(value),
                quality: if cloudy { Quality::Cloudy } else { Quality::Good },
                date: date_of(reference_time, day, days),
            }
        })
        .collect()
}

/// Soil moisture series around `base`.
pub fn soil_moisture_series<R: Rng + ?Sized>(
    rng: &mut R,
    reference_time: NaiveDateTime,
    days: u32,
    base: f64,
    noise_level: f64,
) -> Vec<SoilMoisturePoint> {
    (0..days)
        .map(|day| {
            let precipitation = exponential(rng, SOIL_PRECIPITATION_MEAN);
            let infiltration = (precipitation * 0.1).min(0.2);
            let evaporation = 0.02 + 0.01 * seasonal(day).sin();
            let value = base + infiltration - evaporation + gaussian(rng, noise_level);

            SoilMoisturePoint {
                day,
                value: value.clamp(0.0, 1.0),
                precipitation,
                date: date_of(reference_time, day, days),
            }
        })
        .collect()
}

/// Temperature series around `base` °C. Min and max are 5 °C either side.
pub fn temperature_series<R: Rng + ?Sized>(
    rng: &mut R,
    reference_time: NaiveDateTime,
    days: u32,
    base: f64,
    noise_level: f64,
) -> Vec<TemperaturePoint> {
    (0..days)
        .map(|day| {
            let daily = 8.0 * (2.0 * PI * day as f64).sin();
            let value = base + daily + 10.0 * seasonal(day).sin() + gaussian(rng, noise_level);

            TemperaturePoint {
                day,
                value,
                min_temp: value - 5.0,
                max_temp: value + 5.0,
                date: date_of(reference_time, day, days),
            }
        })
        .collect()
}

/// Precipitation events occurring with daily probability `base_rate`.
pub fn precipitation_series<R: Rng + ?Sized>(
    rng: &mut R,
    reference_time: NaiveDateTime,
    days: u32,
    base_rate: f64,
) -> Vec<PrecipitationPoint> {
    (0..days)
        .map(|day| {
            let (value, duration_hours) = if rng.gen::<f64>() < base_rate {
                let intensity = exponential(rng, PRECIPITATION_INTENSITY_MEAN);
                (intensity, rng.gen_range(1..=5))
            } else {
                (0.0, 0)
            };

            PrecipitationPoint {
                day,
                value,
                duration_hours,
                date: date_of(reference_time, day, days),
            }
        })
        .collect()
}

/// Seeded source of parcel series sharing one reference time.
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    rng: SimRng,
    reference_time: NaiveDateTime,
}

impl SeriesGenerator {
    /// Generator drawing from `rng`; series end the day before
    /// `reference_time`.
    pub fn new(rng: SimRng, reference_time: NaiveDateTime) -> Self {
        Self {
            rng,
            reference_time,
        }
    }

    /// Time every series is dated back from.
    pub fn reference_time(&self) -> NaiveDateTime {
        self.reference_time
    }

    /// Random source, for fixtures that should share the seed.
    pub fn rng_mut(&mut self) -> &mut SimRng {
        &mut self.rng
    }

    /// Vegetation index series around `base` with the default noise.
    pub fn ndvi(&mut self, days: u32, base: f64) -> Vec<NdviPoint> {
        ndvi_series(&mut self.rng, self.reference_time, days, base, NDVI_NOISE)
    }

    /// Soil moisture series around `base` with the default noise.
    pub fn soil_moisture(&mut self, days: u32, base: f64) -> Vec<SoilMoisturePoint> {
        soil_moisture_series(
            &mut self.rng,
            self.reference_time,
            days,
            base,
            SOIL_MOISTURE_NOISE,
        )
    }

    /// Temperature series around `base` °C with the default noise.
    pub fn temperature(&mut self, days: u32, base: f64) -> Vec<TemperaturePoint> {
        temperature_series(
            &mut self.rng,
            self.reference_time,
            days,
            base,
            TEMPERATURE_NOISE,
        )
    }

    /// Precipitation events with daily probability `base_rate`.
    pub fn precipitation(&mut self, days: u32, base_rate: f64) -> Vec<PrecipitationPoint> {
        precipitation_series(&mut self.rng, self.reference_time, days, base_rate)
    }

    /// All four series for one parcel, using the crop's baselines.
    pub fn parcel_bundle(
        &mut self,
        parcel_id: &str,
        crop_type: &str,
        days: u32,
    ) -> ParcelSeriesBundle {
        let params = CropParams::for_crop(crop_type);

        let ndvi = self.ndvi(days, params.ndvi_base);
        let soil_moisture = self.soil_moisture(days, params.soil_base);
        let temperature = self.temperature(days, params.temp_base);
        let precipitation = self.precipitation(days, DEFAULT_PRECIPITATION_RATE);

        tracing::debug!(parcel_id, crop_type, days, "Generated parcel series");

        ParcelSeriesBundle::new(
            parcel_id,
            crop_type,
            self.reference_time,
            ndvi,
            soil_moisture,
            temperature,
            precipitation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn reference() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    fn rng(seed: u64) -> SimRng {
        SimRng::seed_from_u64(seed)
    }

    #[test]
    fn test_ndvi_values_null_or_in_range() {
        let series = ndvi_series(&mut rng(1), reference(), 365, 0.9, 0.3);
        assert_eq!(series.len(), 365);
        for p in &series {
            match (p.quality, p.value) {
                (Quality::Cloudy, None) => {}
                (Quality::Good, Some(v)) => assert!((0.0..=1.0).contains(&v)),
                other => panic!("inconsistent point {:?}", other),
            }
        }
    }

    #[test]
    fn test_cloudy_fraction_near_twenty_percent() {
        let series = ndvi_series(&mut rng(2), reference(), 10_000, 0.6, NDVI_NOISE);
        let cloudy = series.iter().filter(|p| p.quality == Quality::Cloudy).count();
        let fraction = cloudy as f64 / series.len() as f64;
        assert!((0.17..0.23).contains(&fraction), "fraction {}", fraction);
    }

    #[test]
    fn test_soil_moisture_clipped() {
        for base in [0.0, 0.5, 1.0] {
            for p in soil_moisture_series(&mut rng(3), reference(), 200, base, 0.5) {
                assert!((0.0..=1.0).contains(&p.value));
                assert!(p.precipitation >= 0.0);
            }
        }
    }

    #[test]
    fn test_temperature_min_max_offsets() {
        for p in temperature_series(&mut rng(4), reference(), 60, 20.0, TEMPERATURE_NOISE) {
            assert_relative_eq!(p.min_temp, p.value - 5.0);
            assert_relative_eq!(p.max_temp, p.value + 5.0);
        }
    }

    #[test]
    fn test_precipitation_duration_matches_intensity() {
        let series = precipitation_series(&mut rng(5), reference(), 2_000, 0.3);
        let wet = series.iter().filter(|p| p.value > 0.0).count();
        assert!(wet > 0);
        for p in &series {
            if p.value == 0.0 {
                assert_eq!(p.duration_hours, 0);
            } else {
                assert!((1..=5).contains(&p.duration_hours));
            }
        }
    }

    #[test]
    fn test_zero_rate_is_always_dry() {
        let series = precipitation_series(&mut rng(6), reference(), 100, 0.0);
        assert!(series.iter().all(|p| p.value == 0.0 && p.duration_hours == 0));
    }

    #[test]
    fn test_dates_count_back_from_reference() {
        let series = temperature_series(&mut rng(7), reference(), 30, 18.0, TEMPERATURE_NOISE);
        assert_eq!(series[0].date, reference() - Duration::days(30));
        assert_eq!(series[29].date, reference() - Duration::days(1));
    }

    #[test]
    fn test_seeded_generators_are_deterministic() {
        let mut a = SeriesGenerator::new(rng(42), reference());
        let mut b = SeriesGenerator::new(rng(42), reference());
        assert_eq!(
            a.parcel_bundle("parcel_000", "corn", 30),
            b.parcel_bundle("parcel_000", "corn", 30)
        );

        let mut c = SeriesGenerator::new(rng(43), reference());
        assert_ne!(
            a.parcel_bundle("parcel_001", "corn", 30),
            c.parcel_bundle("parcel_001", "corn", 30)
        );
    }

    #[test]
    fn test_zero_days_gives_empty_series() {
        let mut generator = SeriesGenerator::new(rng(8), reference());
        let bundle = generator.parcel_bundle("parcel_000", "lettuce", 0);
        assert!(bundle.ndvi.is_empty());
        assert!(bundle.precipitation.is_empty());
    }
}
