//! Rescaling raster samples into the 0-255 display range.

use crate::{GeoTransform, Raster};

/// Output value for every valid sample of a constant raster.
pub const MID_GRAY: u8 = 128;

/// How a raster was rescaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizationMethod {
    /// All valid samples were within [-1, 1]: `(v + 1) * 127.5`.
    VegetationIndex,
    /// Linear stretch between the valid minimum and maximum.
    MinMax {
        /// Smallest valid sample.
        min: f32,
        /// Largest valid sample.
        max: f32,
    },
    /// Every valid sample had the same value outside [-1, 1]; mapped to
    /// [`MID_GRAY`].
    Constant {
        /// The shared sample value.
        value: f32,
    },
    /// The raster had no valid samples.
    Empty,
}

/// An 8-bit raster ready for tiling, keeping the source georeferencing.
#[derive(Debug, Clone)]
pub struct NormalizedRaster {
    data: Vec<u8>,
    width: u32,
    height: u32,
    transform: GeoTransform,
    method: NormalizationMethod,
}

impl NormalizedRaster {
    /// Display values in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Dimensions in pixels (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel to geographic transform.
    pub fn transform(&self) -> GeoTransform {
        self.transform
    }

    /// The rescaling that was applied.
    pub fn method(&self) -> NormalizationMethod {
        self.method
    }

    /// Value of the pixel containing a geographic coordinate, if any.
    pub fn value_at(&self, lon: f64, lat: f64) -> Option<u8> {
        let (col, row) = self.transform.geo_to_pixel(lon, lat)?;
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col.floor() as u64, row.floor() as u64);
        if col >= self.width as u64 || row >= self.height as u64 {
            return None;
        }
        self.data
            .get((row * self.width as u64 + col) as usize)
            .copied()
    }
}

/// Rescale a raster to 0-255.
///
/// Samples that are non-finite or equal to the no-data value become 0.
pub fn normalize(raster: &Raster) -> NormalizedRaster {
    let (width, height) = raster.dimensions();

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in raster.data().iter().filter(|v| raster.is_valid(**v)) {
        min = min.min(v);
        max = max.max(v);
    }

    let method = if min > max {
        NormalizationMethod::Empty
    } else if min >= -1.0 && max <= 1.0 {
        NormalizationMethod::VegetationIndex
    } else if min == max {
        NormalizationMethod::Constant { value: min }
    } else {
        NormalizationMethod::MinMax { min, max }
    };

    let scale = |v: f32| -> u8 {
        match method {
            NormalizationMethod::VegetationIndex => to_byte((v as f64 + 1.0) * 127.5),
            NormalizationMethod::MinMax { min, max } => {
                to_byte((v as f64 - min as f64) / (max as f64 - min as f64) * 255.0)
            }
            NormalizationMethod::Constant { .. } => MID_GRAY,
            NormalizationMethod::Empty => 0,
        }
    };

    let data = raster
        .data()
        .iter()
        .map(|&v| if raster.is_valid(v) { scale(v) } else { 0 })
        .collect();

    tracing::debug!(?method, width, height, "Normalized raster");

    NormalizedRaster {
        data,
        width,
        height,
        transform: raster.transform(),
        method,
    }
}

/// Clip to [0, 255] and truncate.
fn to_byte(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(data: Vec<f32>, no_data: Option<f32>) -> Raster {
        let width = data.len() as u32;
        Raster::new(
            width,
            1,
            data,
            GeoTransform::north_up(0.0, 1.0, 1.0, 1.0),
            no_data,
        )
        .unwrap()
    }

    #[test]
    fn test_vegetation_index_range() {
        let n = normalize(&raster(vec![-1.0, 0.0, 0.5, 1.0], None));
        assert_eq!(n.method(), NormalizationMethod::VegetationIndex);
        assert_eq!(n.data(), &[0, 127, 191, 255]);
    }

    #[test]
    fn test_min_max_stretch() {
        let n = normalize(&raster(vec![10.0, 20.0, 30.0], None));
        assert_eq!(n.method(), NormalizationMethod::MinMax { min: 10.0, max: 30.0 });
        assert_eq!(n.data(), &[0, 127, 255]);
    }

    #[test]
    fn test_constant_raster_is_mid_gray() {
        let n = normalize(&raster(vec![42.0; 4], None));
        assert_eq!(n.method(), NormalizationMethod::Constant { value: 42.0 });
        assert!(n.data().iter().all(|&v| v == MID_GRAY));
    }

    #[test]
    fn test_constant_vegetation_raster_uses_index_formula() {
        let n = normalize(&raster(vec![0.0; 3], None));
        assert_eq!(n.method(), NormalizationMethod::VegetationIndex);
        assert_eq!(n.data(), &[127, 127, 127]);
    }

    #[test]
    fn test_invalid_samples_ignored_and_zeroed() {
        let n = normalize(&raster(vec![f32::NAN, 0.5, -9999.0, 1.0], Some(-9999.0)));
        // Without masking, -9999 would force a min-max stretch.
        assert_eq!(n.method(), NormalizationMethod::VegetationIndex);
        assert_eq!(n.data(), &[0, 191, 0, 255]);
    }

    #[test]
    fn test_no_valid_samples() {
        let n = normalize(&raster(vec![f32::NAN, f32::INFINITY], None));
        assert_eq!(n.method(), NormalizationMethod::Empty);
        assert_eq!(n.data(), &[0, 0]);
    }

    #[test]
    fn test_value_at() {
        let n = normalize(&raster(vec![-1.0, 1.0], None));
        assert_eq!(n.value_at(0.5, 0.5), Some(0));
        assert_eq!(n.value_at(1.5, 0.5), Some(255));
        assert_eq!(n.value_at(2.5, 0.5), None);
        assert_eq!(n.value_at(0.5, 1.5), None);
    }
}
