//! Error types for the common crate.

use thiserror::Error;

/// Errors raised while building shared types.
#[derive(Debug, Error)]
pub enum CommonError {
    /// Bounds are non-finite, outside the globe, or violate west < east or
    /// south < north.
    #[error("Invalid area of interest: west={west} south={south} east={east} north={north}")]
    InvalidAoi {
        /// West bound in degrees.
        west: f64,
        /// South bound in degrees.
        south: f64,
        /// East bound in degrees.
        east: f64,
        /// North bound in degrees.
        north: f64,
    },

    /// Text could not be parsed as `west,south,east,north`.
    #[error("Cannot parse area of interest from '{0}' (expected west,south,east,north)")]
    AoiParse(String),
}
