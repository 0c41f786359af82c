//! Tiling configuration, loaded from YAML and overridden from the command
//! line.

use crate::{Result, RunnerError};
use astrofarm_common::AreaOfInterest;
use astrofarm_tiles::{GridScheme, DEFAULT_TILE_SIZE, MAX_ZOOM, PLACEHOLDER_VALUE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Zoom levels written when none are configured.
pub const DEFAULT_ZOOM_LEVELS: [u8; 2] = [8, 12];

/// Which pixel sampler fills the tiles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SamplerKind {
    /// Every pixel set to `fill_value`.
    #[default]
    Constant,
    /// Nearest-neighbour lookup into the normalized raster.
    Nearest,
}

/// Settings for the tile pyramid.
///
/// ```yaml
/// aoi: { west: -120.9, south: 35.0, east: -118.4, north: 37.0 }
/// zoom_levels: [8, 12]
/// tile_size: 256
/// fill_value: 128
/// grid: linear
/// sampler: constant
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TilingConfig {
    pub aoi: AreaOfInterest,
    pub zoom_levels: Vec<u8>,
    pub tile_size: u32,
    pub fill_value: u8,
    pub grid: GridScheme,
    pub sampler: SamplerKind,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            aoi: AreaOfInterest::default(),
            zoom_levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            tile_size: DEFAULT_TILE_SIZE,
            fill_value: PLACEHOLDER_VALUE,
            grid: GridScheme::default(),
            sampler: SamplerKind::default(),
        }
    }
}

impl TilingConfig {
    /// Parse from YAML; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load a YAML file. Validation is left to the caller so command-line
    /// overrides can be applied first.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RunnerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text).map_err(|source| RunnerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), ?config, "Loaded tiling config");
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings no pyramid can be written with.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(RunnerError::InvalidConfig(
                "tile_size must be positive".to_string(),
            ));
        }
        if let Some(z) = self.zoom_levels.iter().find(|z| **z > MAX_ZOOM) {
            return Err(RunnerError::InvalidConfig(format!(
                "zoom level {} exceeds maximum {}",
                z, MAX_ZOOM
            )));
        }
        Ok(())
    }
}
