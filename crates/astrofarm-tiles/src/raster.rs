//! Single-band georeferenced raster.

use crate::{Result, TileError};
use astrofarm_common::AreaOfInterest;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::ColorType;

/// GeoTIFF ModelPixelScaleTag.
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepointTag.
const TAG_MODEL_TIEPOINT: u16 = 33922;
/// GeoTIFF ModelTransformationTag.
const TAG_MODEL_TRANSFORMATION: u16 = 34264;
/// GDAL_NODATA tag, stored as ASCII.
const TAG_GDAL_NODATA: u16 = 42113;

/// Affine map from pixel (column, row) to geographic (x, y).
///
/// Coefficients use GDAL's ordering:
/// `x = origin_x + col * pixel_width + row * row_rotation`,
/// `y = origin_y + col * col_rotation + row * pixel_height`.
/// North-up rasters have zero rotations and a negative `pixel_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X of the top-left corner of pixel (0, 0).
    pub origin_x: f64,
    /// X step per column.
    pub pixel_width: f64,
    /// X step per row.
    pub row_rotation: f64,
    /// Y of the top-left corner of pixel (0, 0).
    pub origin_y: f64,
    /// Y step per column.
    pub col_rotation: f64,
    /// Y step per row (negative for north-up).
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform from a top-left corner and positive pixel sizes.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height: -pixel_height.abs(),
        }
    }

    /// Build from GDAL's six-coefficient array.
    pub fn from_gdal(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            col_rotation: c[4],
            pixel_height: c[5],
        }
    }

    /// Geographic coordinate of a (fractional) pixel position.
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Fractional pixel position of a geographic coordinate.
    ///
    /// Returns `None` for a degenerate (non-invertible) transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let col = (dx * self.pixel_height - dy * self.row_rotation) / det;
        let row = (dy * self.pixel_width - dx * self.col_rotation) / det;
        Some((col, row))
    }

    /// Pixel window covering a geographic box, clamped to a `width` x `height`
    /// raster.
    ///
    /// Offsets are floored and far edges ceiled so that every pixel touching
    /// the box is included.
    pub fn window_for(&self, aoi: &AreaOfInterest, width: u32, height: u32) -> PixelWindow {
        let corners = [
            (aoi.west, aoi.north),
            (aoi.east, aoi.north),
            (aoi.west, aoi.south),
            (aoi.east, aoi.south),
        ];

        let mut col_min = f64::INFINITY;
        let mut col_max = f64::NEG_INFINITY;
        let mut row_min = f64::INFINITY;
        let mut row_max = f64::NEG_INFINITY;
        for (x, y) in corners {
            let Some((col, row)) = self.geo_to_pixel(x, y) else {
                return PixelWindow::default();
            };
            col_min = col_min.min(col);
            col_max = col_max.max(col);
            row_min = row_min.min(row);
            row_max = row_max.max(row);
        }

        let clamp = |v: f64, limit: u32| v.clamp(0.0, limit as f64) as u32;
        let col_off = clamp(snap(col_min).floor(), width);
        let row_off = clamp(snap(row_min).floor(), height);
        let col_end = clamp(snap(col_max).ceil(), width);
        let row_end = clamp(snap(row_max).ceil(), height);

        PixelWindow {
            col_off,
            row_off,
            cols: col_end.saturating_sub(col_off),
            rows: row_end.saturating_sub(row_off),
        }
    }

    /// Transform of a sub-window whose top-left pixel is `(col_off, row_off)`.
    pub fn for_window(&self, window: &PixelWindow) -> Self {
        let (origin_x, origin_y) = self.pixel_to_geo(window.col_off as f64, window.row_off as f64);
        Self {
            origin_x,
            origin_y,
            ..*self
        }
    }
}

/// Round pixel positions that are within rounding error of a pixel edge, so
/// a bound lying exactly on an edge does not pull in the neighbouring pixel.
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-6 {
        r
    } else {
        v
    }
}

/// A rectangular block of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelWindow {
    /// First column.
    pub col_off: u32,
    /// First row.
    pub row_off: u32,
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
}

impl PixelWindow {
    /// True when the window holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

/// A single-band raster loaded into memory.
#[derive(Debug, Clone)]
pub struct Raster {
    /// Samples in row-major order (north to south, west to east).
    data: Vec<f32>,
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Pixel to geographic transform.
    transform: GeoTransform,
    /// Samples equal to this are treated as missing.
    no_data_value: Option<f32>,
}

impl Raster {
    /// Wrap an in-memory sample buffer.
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<f32>,
        transform: GeoTransform,
        no_data_value: Option<f32>,
    ) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(TileError::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            transform,
            no_data_value,
        })
    }

    /// Load the first image of a GeoTIFF file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut decoder = Decoder::new(file)?;

        // Satellite scenes can be large; allow up to 1 GB of decoded samples.
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024;
        limits.intermediate_buffer_size = 1024 * 1024 * 1024;
        limits.ifd_value_size = 1024 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        match decoder.colortype()? {
            ColorType::Gray(_) => {}
            other => return Err(TileError::NotSingleBand(format!("{:?}", other))),
        }

        let (width, height) = decoder.dimensions()?;
        let transform = Self::read_geotransform(&mut decoder, path)?;
        let no_data_value = Self::read_nodata_value(&mut decoder);
        let data = Self::decode_samples(&mut decoder)?;

        tracing::debug!(
            path = %path.display(),
            width,
            height,
            ?no_data_value,
            "Loaded raster"
        );

        Self::new(width, height, data, transform, no_data_value)
    }

    /// Read the geotransform from GeoTIFF tags.
    ///
    /// Prefers ModelPixelScale + ModelTiepoint, falling back to
    /// ModelTransformation.
    fn read_geotransform<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
        path: &Path,
    ) -> Result<GeoTransform> {
        let tiepoint = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(TAG_MODEL_TIEPOINT));
        let pixel_scale = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(TAG_MODEL_PIXEL_SCALE));

        if let (Ok(tiepoint), Ok(scale)) = (tiepoint, pixel_scale) {
            if tiepoint.len() >= 6 && scale.len() >= 2 {
                // Tiepoint format: [i, j, k, x, y, z] maps pixel (i, j) to (x, y)
                let (i, j) = (tiepoint[0], tiepoint[1]);
                let (tie_x, tie_y) = (tiepoint[3], tiepoint[4]);
                let (scale_x, scale_y) = (scale[0], scale[1]);

                return Ok(GeoTransform::north_up(
                    tie_x - i * scale_x,
                    tie_y + j * scale_y,
                    scale_x,
                    scale_y,
                ));
            }
        }

        if let Ok(m) = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(TAG_MODEL_TRANSFORMATION)) {
            if m.len() >= 8 {
                return Ok(GeoTransform::from_gdal([m[3], m[0], m[1], m[7], m[4], m[5]]));
            }
        }

        Err(TileError::InvalidGeoTiff {
            path: path.to_path_buf(),
            reason: "no ModelPixelScale/ModelTiepoint or ModelTransformation tags".to_string(),
        })
    }

    /// Decode samples of any numeric type to `f32`.
    fn decode_samples<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<Vec<f32>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::F32(data) => Ok(data),
            DecodingResult::F64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
        }
    }

    /// Read the no-data value from the GDAL_NODATA tag, if present.
    fn read_nodata_value<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
        decoder
            .get_tag_ascii_string(Tag::from_u16_exhaustive(TAG_GDAL_NODATA))
            .ok()
            .and_then(|s| s.trim().trim_end_matches('\0').parse().ok())
    }

    /// Copy out a pixel window as a new raster with an adjusted transform.
    ///
    /// The window is clamped to the raster; an out-of-range window yields an
    /// empty raster.
    pub fn crop(&self, window: &PixelWindow) -> Raster {
        let col_off = window.col_off.min(self.width);
        let row_off = window.row_off.min(self.height);
        let cols = window.cols.min(self.width - col_off);
        let rows = window.rows.min(self.height - row_off);
        let window = PixelWindow {
            col_off,
            row_off,
            cols,
            rows,
        };

        let mut data = Vec::with_capacity(cols as usize * rows as usize);
        for row in row_off..row_off + rows {
            let start = (row * self.width + col_off) as usize;
            data.extend_from_slice(&self.data[start..start + cols as usize]);
        }

        Raster {
            data,
            width: cols,
            height: rows,
            transform: self.transform.for_window(&window),
            no_data_value: self.no_data_value,
        }
    }

    /// Crop to the pixels covering an area of interest.
    pub fn crop_to_aoi(&self, aoi: &AreaOfInterest) -> Raster {
        let window = self.transform.window_for(aoi, self.width, self.height);
        if window.is_empty() {
            tracing::warn!(%aoi, "Area of interest does not overlap the raster");
        }
        self.crop(&window)
    }

    /// True if a sample is finite and not the no-data value.
    pub fn is_valid(&self, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.no_data_value {
            Some(nodata) => (value - nodata).abs() >= 0.001,
            None => true,
        }
    }

    /// Samples in row-major order.
    pub fn data(&self) -> &[f32] {
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

    /// The no-data value, if any.
    pub fn no_data_value(&self) -> Option<f32> {
        self.no_data_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// 1° x 1° raster at 0.1° resolution covering lon -121..-120, lat 36..37.
    fn sample_raster() -> Raster {
        let data = (0..100).map(|v| v as f32).collect();
        Raster::new(
            10,
            10,
            data,
            GeoTransform::north_up(-121.0, 37.0, 0.1, 0.1),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_pixel_geo_round_trip() {
        let t = GeoTransform::north_up(-121.0, 37.0, 0.1, 0.1);
        let (x, y) = t.pixel_to_geo(3.0, 4.0);
        assert_relative_eq!(x, -120.7, epsilon = 1e-9);
        assert_relative_eq!(y, 36.6, epsilon = 1e-9);

        let (col, row) = t.geo_to_pixel(x, y).unwrap();
        assert_relative_eq!(col, 3.0, epsilon = 1e-9);
        assert_relative_eq!(row, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_transform_has_no_inverse() {
        let t = GeoTransform::from_gdal([0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(t.geo_to_pixel(1.0, 1.0).is_none());
    }

    #[test]
    fn test_window_for_aoi() {
        let raster = sample_raster();
        let aoi = AreaOfInterest::new(-120.75, 36.45, -120.45, 36.85).unwrap();
        let window = raster.transform().window_for(&aoi, 10, 10);
        // cols 2.5..5.5 -> 2..6, rows 1.5..5.5 -> 1..6
        assert_eq!(
            window,
            PixelWindow {
                col_off: 2,
                row_off: 1,
                cols: 4,
                rows: 5
            }
        );
    }

    #[test]
    fn test_window_on_pixel_edges() {
        let raster = sample_raster();
        let aoi = AreaOfInterest::new(-120.9, 36.0, -120.4, 36.7).unwrap();
        let window = raster.transform().window_for(&aoi, 10, 10);
        assert_eq!(
            window,
            PixelWindow {
                col_off: 1,
                row_off: 3,
                cols: 5,
                rows: 7
            }
        );
    }

    #[test]
    fn test_window_clamped_to_raster() {
        let raster = sample_raster();
        let aoi = AreaOfInterest::new(-125.0, 30.0, -120.55, 40.0).unwrap();
        let window = raster.transform().window_for(&aoi, 10, 10);
        assert_eq!(window.col_off, 0);
        assert_eq!(window.row_off, 0);
        assert_eq!(window.cols, 5);
        assert_eq!(window.rows, 10);
    }

    #[test]
    fn test_crop_copies_block_and_shifts_origin() {
        let raster = sample_raster();
        let cropped = raster.crop(&PixelWindow {
            col_off: 2,
            row_off: 1,
            cols: 3,
            rows: 2,
        });
        assert_eq!(cropped.dimensions(), (3, 2));
        assert_eq!(cropped.data(), &[12.0, 13.0, 14.0, 22.0, 23.0, 24.0]);

        let t = cropped.transform();
        assert_relative_eq!(t.origin_x, -120.8, epsilon = 1e-9);
        assert_relative_eq!(t.origin_y, 36.9, epsilon = 1e-9);
    }

    #[test]
    fn test_crop_to_disjoint_aoi_is_empty() {
        let raster = sample_raster();
        let aoi = AreaOfInterest::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let cropped = raster.crop_to_aoi(&aoi);
        assert!(cropped.data().is_empty());
    }

    #[test]
    fn test_new_checks_length() {
        let result = Raster::new(2, 2, vec![0.0; 3], GeoTransform::north_up(0.0, 0.0, 1.0, 1.0), None);
        assert!(matches!(
            result,
            Err(TileError::DataLength {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_is_valid_respects_nodata() {
        let raster = Raster::new(
            1,
            1,
            vec![0.0],
            GeoTransform::north_up(0.0, 0.0, 1.0, 1.0),
            Some(-9999.0),
        )
        .unwrap();
        assert!(raster.is_valid(0.5));
        assert!(!raster.is_valid(-9999.0));
        assert!(!raster.is_valid(f32::NAN));
        assert!(!raster.is_valid(f32::INFINITY));
    }
}
