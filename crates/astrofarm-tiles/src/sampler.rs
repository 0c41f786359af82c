//! Pixel samplers fill one tile image each.
//!
//! The pyramid writer only decides *which* tiles exist and *where* they go;
//! what ends up inside a tile is up to a [`PixelSampler`].

use crate::{NormalizedRaster, TileBounds, TileCoord};

/// Value written by the placeholder sampler.
pub const PLACEHOLDER_VALUE: u8 = 128;

/// Produces the 8-bit pixels of a single tile.
pub trait PixelSampler {
    /// Return `size * size` grayscale pixels, row-major from the north-west
    /// corner of `bounds`.
    fn sample(&self, coord: TileCoord, bounds: &TileBounds, size: u32) -> Vec<u8>;
}

/// Fills every tile with one value.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSampler {
    value: u8,
}

impl ConstantSampler {
    /// Sampler writing `value` everywhere.
    pub fn new(value: u8) -> Self {
        Self { value }
    }
}

impl Default for ConstantSampler {
    fn default() -> Self {
        Self::new(PLACEHOLDER_VALUE)
    }
}

impl PixelSampler for ConstantSampler {
    fn sample(&self, _coord: TileCoord, _bounds: &TileBounds, size: u32) -> Vec<u8> {
        vec![self.value; size as usize * size as usize]
    }
}

/// Nearest-neighbour lookup into a normalized raster.
///
/// Each output pixel takes the raster pixel under its centre; pixels outside
/// the raster are 0. Latitude is interpolated linearly across the tile.
#[derive(Debug, Clone, Copy)]
pub struct NearestSampler<'a> {
    raster: &'a NormalizedRaster,
}

impl<'a> NearestSampler<'a> {
    /// Sample from `raster`.
    pub fn new(raster: &'a NormalizedRaster) -> Self {
        Self { raster }
    }
}

impl PixelSampler for NearestSampler<'_> {
    fn sample(&self, _coord: TileCoord, bounds: &TileBounds, size: u32) -> Vec<u8> {
        let step_x = bounds.width() / size as f64;
        let step_y = bounds.height() / size as f64;

        let mut pixels = Vec::with_capacity(size as usize * size as usize);
        for py in 0..size {
            let lat = bounds.north - (py as f64 + 0.5) * step_y;
            for px in 0..size {
                let lon = bounds.west + (px as f64 + 0.5) * step_x;
                pixels.push(self.raster.value_at(lon, lat).unwrap_or(0));
            }
        }
        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize, GeoTransform, GridScheme, Raster};

    #[test]
    fn test_constant_sampler_fills_tile() {
        let coord = TileCoord::new(1, 0, 0).unwrap();
        let bounds = coord.bounds(GridScheme::Linear);
        let pixels = ConstantSampler::default().sample(coord, &bounds, 256);
        assert_eq!(pixels.len(), 256 * 256);
        assert!(pixels.iter().all(|&v| v == PLACEHOLDER_VALUE));
    }

    #[test]
    fn test_nearest_sampler_reads_raster() {
        // Two-pixel raster: west half -1, east half 1, covering lon 0..2, lat 0..1
        let raster = Raster::new(
            2,
            1,
            vec![-1.0, 1.0],
            GeoTransform::north_up(0.0, 1.0, 1.0, 1.0),
            None,
        )
        .unwrap();
        let normalized = normalize(&raster);
        let sampler = NearestSampler::new(&normalized);

        let bounds = TileBounds {
            west: 0.0,
            south: 0.0,
            east: 4.0,
            north: 1.0,
        };
        let coord = TileCoord::new(0, 0, 0).unwrap();
        let pixels = sampler.sample(coord, &bounds, 4);

        // Each tile pixel spans 1° of longitude: raster, raster, outside, outside.
        assert_eq!(&pixels[0..4], &[0, 255, 0, 0]);
        assert_eq!(pixels.len(), 16);
    }
}
