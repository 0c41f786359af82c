//! Error types for the series crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading parcels or writing series.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Reading an input file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Creating a directory or writing an output file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error in {path}: {source}")]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A parcel feature lacks a required property.
    #[error("Feature {index} has no '{key}' property")]
    MissingProperty {
        /// Position of the feature in the collection.
        index: usize,
        /// Name of the missing property.
        key: &'static str,
    },
}
