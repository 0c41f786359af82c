//! JSON output for series bundles and parcel files.
//!
//! Files are written one at a time with no rollback: if a write fails the
//! files already on disk are left in place.

use crate::{
    FeatureCollection, Metric, ParcelSeriesBundle, RasterParcelSeries, Result, SeriesError,
};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| SeriesError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Pretty-print `value` to `path`.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let write_err = |source| SeriesError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| SeriesError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(write_err)?;

    tracing::debug!(path = %path.display(), "Wrote JSON");
    Ok(())
}

/// Writes per-metric and combined series files under one directory.
#[derive(Debug, Clone)]
pub struct SeriesWriter {
    root: PathBuf,
}

impl SeriesWriter {
    /// Create `root` and its metric subdirectories.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for metric in Metric::ALL {
            create_dir(&root.join(metric.dir_name()))?;
        }
        Ok(Self { root })
    }

    /// The output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of one metric file for a parcel.
    pub fn metric_path(&self, metric: Metric, parcel_id: &str) -> PathBuf {
        self.root
            .join(metric.dir_name())
            .join(format!("{}.json", parcel_id))
    }

    /// Path of the combined file for a parcel.
    pub fn complete_path(&self, parcel_id: &str) -> PathBuf {
        self.root.join(format!("{}_complete.json", parcel_id))
    }

    /// Write the four metric files and the combined file for one bundle.
    /// Returns the written paths, combined file last.
    pub fn write_bundle(&self, bundle: &ParcelSeriesBundle) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(Metric::ALL.len() + 1);

        for metric in Metric::ALL {
            let path = self.metric_path(metric, &bundle.parcel_id);
            match metric {
                Metric::Ndvi => write_json(&path, &bundle.ndvi)?,
                Metric::SoilMoisture => write_json(&path, &bundle.soil_moisture)?,
                Metric::Temperature => write_json(&path, &bundle.temperature)?,
                Metric::Precipitation => write_json(&path, &bundle.precipitation)?,
            }
            written.push(path);
        }

        let path = self.complete_path(&bundle.parcel_id);
        write_json(&path, bundle)?;
        written.push(path);

        Ok(written)
    }
}

/// Write `{dir}/{parcel_id}.json`, creating `dir` if needed.
pub fn write_raster_series<P: AsRef<Path>>(
    dir: P,
    series: &RasterParcelSeries,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    create_dir(dir)?;
    let path = dir.join(format!("{}.json", series.parcel_id));
    write_json(&path, series)?;
    Ok(path)
}

/// Write a parcels FeatureCollection, creating the parent directory if needed.
pub fn write_feature_collection<P: AsRef<Path>>(
    path: P,
    collection: &FeatureCollection,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir(parent)?;
    }
    write_json(path, collection)?;
    tracing::info!(
        path = %path.display(),
        features = collection.features.len(),
        "Wrote parcels"
    );
    Ok(())
}
