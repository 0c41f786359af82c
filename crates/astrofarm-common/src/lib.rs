//! # astrofarm-common
//!
//! Types shared by the AstroFarm tile and series pipelines.
//!
//! - [`AreaOfInterest`]: the geographic box both pipelines are scoped to.
//! - [`SeedSource`]: how a run obtains its random generator, so that tests and
//!   reproductions can pin a seed while production runs stay random.

mod aoi;
mod error;
mod rng;

pub use aoi::{AreaOfInterest, CENTRAL_VALLEY};
pub use error::CommonError;
pub use rng::{SeedSource, SimRng};

/// Result type for common operations.
pub type Result<T> = std::result::Result<T, CommonError>;
