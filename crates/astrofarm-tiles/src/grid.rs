//! Web tile grid addressing and AOI intersection.
//!
//! A zoom level `z` splits the world into 2^z x 2^z tiles. Columns divide
//! longitude [-180, 180) evenly. Rows run north to south; how they divide
//! latitude depends on the [`GridScheme`].

use crate::{Result, TileError};
use astrofarm_common::AreaOfInterest;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Minimum valid zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Maximum valid zoom level. 2^24 tiles per axis still fits in a `u32`
/// with room for the `x + 1` edge computation.
pub const MAX_ZOOM: u8 = 24;

/// Latitude limit of the tile grid (the Web Mercator cut-off, rounded).
pub const LINEAR_LAT_LIMIT: f64 = 85.0511;

/// Total latitude span covered by the linear grid.
const LINEAR_LAT_SPAN: f64 = 170.1022;

/// How tile rows map onto latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridScheme {
    /// Rows divide [-85.0511, 85.0511] into equal latitude bands.
    #[default]
    Linear,
    /// Rows follow the spherical Mercator projection (OSM Slippy Map).
    WebMercator,
}

impl GridScheme {
    /// Fractional column index of a longitude at `n` tiles per axis.
    fn column_of(self, lon: f64, n: f64) -> f64 {
        (lon + 180.0) / 360.0 * n
    }

    /// Fractional row index of a latitude at `n` tiles per axis.
    fn row_of(self, lat: f64, n: f64) -> f64 {
        let lat = lat.clamp(-LINEAR_LAT_LIMIT, LINEAR_LAT_LIMIT);
        match self {
            GridScheme::Linear => (LINEAR_LAT_LIMIT - lat) / LINEAR_LAT_SPAN * n,
            GridScheme::WebMercator => {
                let lat_rad = lat.to_radians();
                (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n
            }
        }
    }

    /// Latitude of the northern edge of row `y` at `n` tiles per axis.
    fn row_north(self, y: u32, n: f64) -> f64 {
        match self {
            GridScheme::Linear => LINEAR_LAT_LIMIT - (y as f64 * LINEAR_LAT_SPAN / n),
            GridScheme::WebMercator => (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees(),
        }
    }
}

impl fmt::Display for GridScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridScheme::Linear => write!(f, "linear"),
            GridScheme::WebMercator => write!(f, "web-mercator"),
        }
    }
}

impl FromStr for GridScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(GridScheme::Linear),
            "web-mercator" | "webmercator" | "mercator" => Ok(GridScheme::WebMercator),
            other => Err(format!(
                "unknown grid scheme '{}' (expected linear or web-mercator)",
                other
            )),
        }
    }
}

/// Geographic rectangle covered by one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    /// Western longitude edge.
    pub west: f64,
    /// Southern latitude edge.
    pub south: f64,
    /// Eastern longitude edge.
    pub east: f64,
    /// Northern latitude edge.
    pub north: f64,
}

impl TileBounds {
    /// Strict rectangle overlap test against an AOI.
    ///
    /// Tiles that only share an edge or a corner with the AOI do not intersect.
    pub fn intersects_aoi(&self, aoi: &AreaOfInterest) -> bool {
        self.west < aoi.east && self.east > aoi.west && self.north > aoi.south && self.south < aoi.north
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

/// OSM-style tile coordinates (z, x, y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level.
    pub z: u8,
    /// X coordinate (column, 0 at 180°W, increases eastward).
    pub x: u32,
    /// Y coordinate (row, 0 at the northern limit, increases southward).
    pub y: u32,
}

impl TileCoord {
    /// Create a validated tile coordinate.
    pub fn new(z: u8, x: u32, y: u32) -> Result<Self> {
        let n = tiles_per_axis(z)?;
        if x >= n || y >= n {
            return Err(TileError::TileOutOfRange { z, x, y });
        }
        Ok(Self { z, x, y })
    }

    /// Convert latitude/longitude to the tile containing it.
    ///
    /// Coordinates beyond the grid are clamped to the outermost tiles.
    pub fn from_lat_lon(lat: f64, lon: f64, z: u8, scheme: GridScheme) -> Result<Self> {
        let n = tiles_per_axis(z)?;
        let max_coord = n as i64 - 1;
        let nf = n as f64;

        let x = (scheme.column_of(lon, nf).floor() as i64).clamp(0, max_coord) as u32;
        let y = (scheme.row_of(lat, nf).floor() as i64).clamp(0, max_coord) as u32;

        Ok(Self { z, x, y })
    }

    /// Geographic rectangle of this tile under the given scheme.
    pub fn bounds(&self, scheme: GridScheme) -> TileBounds {
        let n = (1u64 << self.z) as f64;

        TileBounds {
            west: -180.0 + (self.x as f64 * 360.0 / n),
            east: -180.0 + ((self.x + 1) as f64 * 360.0 / n),
            north: scheme.row_north(self.y, n),
            south: scheme.row_north(self.y + 1, n),
        }
    }

    /// Path of this tile's image below `root`: `{root}/{z}/{x}/{y}.png`.
    pub fn image_path(&self, root: &Path) -> PathBuf {
        root.join(self.z.to_string())
            .join(self.x.to_string())
            .join(format!("{}.png", self.y))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Number of tiles along one axis at zoom `z`.
fn tiles_per_axis(z: u8) -> Result<u32> {
    if !(MIN_ZOOM..=MAX_ZOOM).contains(&z) {
        return Err(TileError::InvalidZoomLevel(z));
    }
    Ok(1u32 << z)
}

/// The tile grid for one [`GridScheme`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TileGrid {
    scheme: GridScheme,
}

impl TileGrid {
    /// Create a grid using the given row scheme.
    pub fn new(scheme: GridScheme) -> Self {
        Self { scheme }
    }

    /// The row scheme of this grid.
    pub fn scheme(&self) -> GridScheme {
        self.scheme
    }

    /// Total number of tiles at a zoom level.
    pub fn tile_count(&self, z: u8) -> Result<u64> {
        let n = tiles_per_axis(z)? as u64;
        Ok(n * n)
    }

    /// Geographic bounds of a tile.
    pub fn bounds(&self, coord: &TileCoord) -> TileBounds {
        coord.bounds(self.scheme)
    }

    /// Every tile at zoom `z` whose rectangle strictly intersects `aoi`.
    ///
    /// Only a candidate window around the AOI is scanned, padded by one tile
    /// on every side; each candidate is then checked with
    /// [`TileBounds::intersects_aoi`]. The result is identical to testing all
    /// 4^z tiles. Tiles are ordered by column, then row.
    pub fn tiles_intersecting(&self, z: u8, aoi: &AreaOfInterest) -> Result<Vec<TileCoord>> {
        let n = tiles_per_axis(z)?;
        let nf = n as f64;
        let max_coord = n as i64 - 1;
        let clamp = |v: f64| (v.floor() as i64).clamp(0, max_coord) as u32;

        let x_lo = clamp(self.scheme.column_of(aoi.west, nf) - 1.0);
        let x_hi = clamp(self.scheme.column_of(aoi.east, nf) + 1.0);
        let y_lo = clamp(self.scheme.row_of(aoi.north, nf) - 1.0);
        let y_hi = clamp(self.scheme.row_of(aoi.south, nf) + 1.0);

        let mut tiles = Vec::new();
        for x in x_lo..=x_hi {
            for y in y_lo..=y_hi {
                let coord = TileCoord { z, x, y };
                if coord.bounds(self.scheme).intersects_aoi(aoi) {
                    tiles.push(coord);
                }
            }
        }
        Ok(tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use astrofarm_common::CENTRAL_VALLEY;

    /// Scan every tile at a zoom level.
    fn brute_force(grid: &TileGrid, z: u8, aoi: &AreaOfInterest) -> Vec<TileCoord> {
        let n = 1u32 << z;
        let mut tiles = Vec::new();
        for x in 0..n {
            for y in 0..n {
                let coord = TileCoord { z, x, y };
                if grid.bounds(&coord).intersects_aoi(aoi) {
                    tiles.push(coord);
                }
            }
        }
        tiles
    }

    #[test]
    fn test_central_valley_zoom_8() {
        let grid = TileGrid::new(GridScheme::Linear);
        assert_eq!(grid.tile_count(8).unwrap(), 256 * 256);

        let tiles = grid.tiles_intersecting(8, &CENTRAL_VALLEY).unwrap();
        assert_eq!(tiles.len(), 8);
        assert!(tiles.iter().all(|t| (42..=43).contains(&t.x)));
        assert!(tiles.iter().all(|t| (72..=75).contains(&t.y)));
        assert_eq!(tiles, brute_force(&grid, 8, &CENTRAL_VALLEY));
    }

    #[test]
    fn test_matches_brute_force() {
        let aois = [
            CENTRAL_VALLEY,
            AreaOfInterest::new(-10.0, -5.0, 10.0, 5.0).unwrap(),
            AreaOfInterest::new(170.0, 80.0, 180.0, 89.0).unwrap(),
            AreaOfInterest::new(-180.0, -90.0, 180.0, 90.0).unwrap(),
            AreaOfInterest::new(-0.001, -0.001, 0.001, 0.001).unwrap(),
        ];
        for scheme in [GridScheme::Linear, GridScheme::WebMercator] {
            let grid = TileGrid::new(scheme);
            for aoi in &aois {
                for z in 0..=7 {
                    assert_eq!(
                        grid.tiles_intersecting(z, aoi).unwrap(),
                        brute_force(&grid, z, aoi),
                        "scheme {} zoom {} aoi {}",
                        scheme,
                        z,
                        aoi
                    );
                }
            }
        }
    }

    #[test]
    fn test_edge_touching_tiles_excluded() {
        // At zoom 1 the column boundary sits exactly on the prime meridian.
        let grid = TileGrid::new(GridScheme::Linear);
        let east_half = AreaOfInterest::new(0.0, -10.0, 90.0, 10.0).unwrap();
        let tiles = grid.tiles_intersecting(1, &east_half).unwrap();
        assert!(tiles.iter().all(|t| t.x == 1), "west tile touches only at lon 0: {:?}", tiles);

        // Row boundary at zoom 1 is the equator.
        let north_half = AreaOfInterest::new(-10.0, 0.0, 10.0, 10.0).unwrap();
        let tiles = grid.tiles_intersecting(1, &north_half).unwrap();
        assert!(tiles.iter().all(|t| t.y == 0), "south tile touches only at lat 0: {:?}", tiles);
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn test_aoi_sharing_tile_edge_at_zoom_8() {
        let grid = TileGrid::new(GridScheme::Linear);
        let coord = TileCoord::new(8, 42, 72).unwrap();
        let b = grid.bounds(&coord);

        // An AOI whose west edge is exactly this tile's east edge.
        let aoi = AreaOfInterest::new(b.east, b.south, b.east + 1.0, b.north).unwrap();
        let tiles = grid.tiles_intersecting(8, &aoi).unwrap();
        assert!(!tiles.contains(&coord));
        assert!(tiles.contains(&TileCoord::new(8, 43, 72).unwrap()));
    }

    #[test]
    fn test_zoom_zero_is_single_world_tile() {
        let grid = TileGrid::default();
        let tiles = grid.tiles_intersecting(0, &CENTRAL_VALLEY).unwrap();
        assert_eq!(tiles, vec![TileCoord::new(0, 0, 0).unwrap()]);

        let b = grid.bounds(&tiles[0]);
        assert_relative_eq!(b.west, -180.0);
        assert_relative_eq!(b.east, 180.0);
        assert_relative_eq!(b.north, 85.0511);
        assert_relative_eq!(b.south, -85.0511);
    }

    #[test]
    fn test_linear_bounds_formula() {
        let coord = TileCoord::new(8, 42, 72).unwrap();
        let b = coord.bounds(GridScheme::Linear);
        assert_relative_eq!(b.west, -180.0 + 42.0 * 360.0 / 256.0);
        assert_relative_eq!(b.east, -180.0 + 43.0 * 360.0 / 256.0);
        assert_relative_eq!(b.north, 85.0511 - 72.0 * 170.1022 / 256.0);
        assert_relative_eq!(b.south, 85.0511 - 73.0 * 170.1022 / 256.0);
    }

    #[test]
    fn test_aoi_outside_grid_yields_nothing() {
        let grid = TileGrid::default();
        let polar = AreaOfInterest::new(-10.0, 86.0, 10.0, 89.0).unwrap();
        assert!(grid.tiles_intersecting(4, &polar).unwrap().is_empty());
    }

    #[test]
    fn test_mercator_equator() {
        let coord = TileCoord::from_lat_lon(0.0, 0.0, 12, GridScheme::WebMercator).unwrap();
        assert_eq!(coord.x, 2048);
        assert_eq!(coord.y, 2048);
    }

    #[test]
    fn test_from_lat_lon_contains_point() {
        let test_points = [
            (36.0, -119.5),
            (47.6062, -122.3321),
            (-33.8688, 151.2093),
            (0.0, 0.0),
        ];
        for scheme in [GridScheme::Linear, GridScheme::WebMercator] {
            for (lat, lon) in test_points {
                let coord = TileCoord::from_lat_lon(lat, lon, 10, scheme).unwrap();
                let b = coord.bounds(scheme);
                assert!(
                    lat >= b.south && lat <= b.north && lon >= b.west && lon <= b.east,
                    "({}, {}) not in {:?} for {}",
                    lat,
                    lon,
                    b,
                    coord
                );
            }
        }
    }

    #[test]
    fn test_invalid_zoom_and_range() {
        assert!(matches!(
            TileCoord::new(25, 0, 0),
            Err(TileError::InvalidZoomLevel(25))
        ));
        assert!(matches!(
            TileCoord::new(2, 4, 0),
            Err(TileError::TileOutOfRange { .. })
        ));
        assert!(TileGrid::default().tiles_intersecting(30, &CENTRAL_VALLEY).is_err());
    }

    #[test]
    fn test_image_path() {
        let coord = TileCoord::new(12, 655, 1407).unwrap();
        assert_eq!(
            coord.image_path(Path::new("./tiles")),
            PathBuf::from("./tiles/12/655/1407.png")
        );
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!("linear".parse::<GridScheme>().unwrap(), GridScheme::Linear);
        assert_eq!(
            "Web-Mercator".parse::<GridScheme>().unwrap(),
            GridScheme::WebMercator
        );
        assert!("utm".parse::<GridScheme>().is_err());
    }
}
