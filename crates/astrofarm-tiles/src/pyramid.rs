//! Writing `{z}/{x}/{y}.png` tile pyramids.

use crate::{GridScheme, PixelSampler, Result, TileCoord, TileError, TileGrid};
use astrofarm_common::AreaOfInterest;
use image::{GrayImage, ImageFormat};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Counts of tiles written by [`TilePyramid::write_levels`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyramidStats {
    /// Tiles written per zoom level.
    pub per_zoom: BTreeMap<u8, usize>,
}

impl PyramidStats {
    /// Total tiles across all levels.
    pub fn total(&self) -> usize {
        self.per_zoom.values().sum()
    }
}

/// Writes the tiles of one AOI below a root directory.
#[derive(Debug, Clone)]
pub struct TilePyramid {
    root: PathBuf,
    aoi: AreaOfInterest,
    grid: TileGrid,
    tile_size: u32,
}

impl TilePyramid {
    /// Pyramid for `aoi` rooted at `root`, using 256 px tiles.
    pub fn new<P: AsRef<Path>>(root: P, aoi: AreaOfInterest, scheme: GridScheme) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            aoi,
            grid: TileGrid::new(scheme),
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    /// Override the tile edge length.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// The root output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Tiles that would be written at zoom `z`.
    pub fn tiles(&self, z: u8) -> Result<Vec<TileCoord>> {
        self.grid.tiles_intersecting(z, &self.aoi)
    }

    /// Write every intersecting tile at zoom `z`. Returns the number written.
    pub fn write_zoom(&self, z: u8, sampler: &dyn PixelSampler) -> Result<usize> {
        let tiles = self.tiles(z)?;
        tracing::info!(
            zoom = z,
            tiles = tiles.len(),
            grid_tiles = self.grid.tile_count(z)?,
            "Writing zoom level"
        );

        for coord in &tiles {
            self.write_tile(*coord, sampler)?;
        }
        Ok(tiles.len())
    }

    /// Write several zoom levels. Duplicates are written once; order does not
    /// matter.
    pub fn write_levels(&self, zooms: &[u8], sampler: &dyn PixelSampler) -> Result<PyramidStats> {
        fs::create_dir_all(&self.root)?;

        let mut stats = PyramidStats::default();
        for z in zooms.iter().copied().collect::<BTreeSet<_>>() {
            let count = self.write_zoom(z, sampler)?;
            stats.per_zoom.insert(z, count);
        }
        Ok(stats)
    }

    /// Sample and save a single tile.
    fn write_tile(&self, coord: TileCoord, sampler: &dyn PixelSampler) -> Result<PathBuf> {
        let bounds = self.grid.bounds(&coord);
        let pixels = sampler.sample(coord, &bounds, self.tile_size);
        let actual = pixels.len();
        let image = GrayImage::from_raw(self.tile_size, self.tile_size, pixels).ok_or(
            TileError::SampleSize {
                size: self.tile_size,
                actual,
            },
        )?;

        let path = coord.image_path(&self.root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| TileError::TileWrite {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(tile = %coord, path = %path.display(), "Wrote tile");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConstantSampler, TileBounds};
    use astrofarm_common::CENTRAL_VALLEY;
    use tempfile::TempDir;

    struct ShortSampler;

    impl PixelSampler for ShortSampler {
        fn sample(&self, _coord: TileCoord, _bounds: &TileBounds, _size: u32) -> Vec<u8> {
            vec![0; 10]
        }
    }

    #[test]
    fn test_write_levels_counts_and_dedupes() {
        let dir = TempDir::new().unwrap();
        let pyramid = TilePyramid::new(dir.path(), CENTRAL_VALLEY, GridScheme::Linear)
            .with_tile_size(16);

        let stats = pyramid
            .write_levels(&[8, 4, 8], &ConstantSampler::default())
            .unwrap();
        assert_eq!(stats.per_zoom.len(), 2);
        assert_eq!(stats.per_zoom[&8], 8);
        assert_eq!(stats.total(), stats.per_zoom[&4] + 8);

        for coord in pyramid.tiles(8).unwrap() {
            assert!(coord.image_path(dir.path()).exists(), "missing {}", coord);
        }
    }

    #[test]
    fn test_tile_image_is_constant_gray() {
        let dir = TempDir::new().unwrap();
        let pyramid = TilePyramid::new(dir.path(), CENTRAL_VALLEY, GridScheme::Linear);
        pyramid.write_zoom(3, &ConstantSampler::new(77)).unwrap();

        let coord = pyramid.tiles(3).unwrap()[0];
        let img = image::open(coord.image_path(dir.path())).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE));
        assert!(img.pixels().all(|p| p.0[0] == 77));
    }

    #[test]
    fn test_wrong_sample_size_is_error() {
        let dir = TempDir::new().unwrap();
        let pyramid = TilePyramid::new(dir.path(), CENTRAL_VALLEY, GridScheme::Linear);
        let err = pyramid.write_zoom(2, &ShortSampler).unwrap_err();
        assert!(matches!(err, TileError::SampleSize { size: 256, actual: 10 }));
    }
}
