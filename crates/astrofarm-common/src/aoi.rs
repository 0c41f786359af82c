//! Geographic area of interest.

use crate::{CommonError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The Central Valley box the demo datasets were prepared for.
pub const CENTRAL_VALLEY: AreaOfInterest = AreaOfInterest {
    west: -120.9,
    south: 35.0,
    east: -118.4,
    north: 37.0,
};

/// A rectangle in geographic degrees (WGS84).
///
/// Always satisfies `west < east` and `south < north`, with longitudes in
/// [-180, 180] and latitudes in [-90, 90], when built through
/// [`AreaOfInterest::new`], [`FromStr`] or deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAoi")]
pub struct AreaOfInterest {
    /// Western longitude bound.
    pub west: f64,
    /// Southern latitude bound.
    pub south: f64,
    /// Eastern longitude bound.
    pub east: f64,
    /// Northern latitude bound.
    pub north: f64,
}

#[derive(Deserialize)]
struct RawAoi {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl TryFrom<RawAoi> for AreaOfInterest {
    type Error = CommonError;

    fn try_from(raw: RawAoi) -> Result<Self> {
        AreaOfInterest::new(raw.west, raw.south, raw.east, raw.north)
    }
}

impl AreaOfInterest {
    /// Create a validated area of interest.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self> {
        let lon_ok = |v: f64| (-180.0..=180.0).contains(&v);
        let lat_ok = |v: f64| (-90.0..=90.0).contains(&v);
        // Range checks also reject NaN and infinite bounds.
        let in_range = lon_ok(west) && lon_ok(east) && lat_ok(south) && lat_ok(north);
        if !(in_range && west < east && south < north) {
            return Err(CommonError::InvalidAoi {
                west,
                south,
                east,
                north,
            });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Check if a point lies inside or on the edge of the box.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

impl Default for AreaOfInterest {
    fn default() -> Self {
        CENTRAL_VALLEY
    }
}

impl fmt::Display for AreaOfInterest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

impl FromStr for AreaOfInterest {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| CommonError::AoiParse(s.to_string()))?;

        match parts.as_slice() {
            [west, south, east, north] => AreaOfInterest::new(*west, *south, *east, *north),
            _ => Err(CommonError::AoiParse(s.to_string())),
        }
    }
}
