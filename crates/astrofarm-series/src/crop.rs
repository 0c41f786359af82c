//! Per-crop baselines for the simulated metrics.

/// Crop labels with their own baseline values.
pub const KNOWN_CROPS: [&str; 4] = ["carrot", "tomato", "lettuce", "corn"];

/// Baseline values a crop's series oscillate around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropParams {
    /// Vegetation index baseline (0-1).
    pub ndvi_base: f64,
    /// Soil moisture baseline (0-1).
    pub soil_base: f64,
    /// Temperature baseline in °C.
    pub temp_base: f64,
}

impl CropParams {
    /// Carrot baselines, also used for unknown crops.
    pub const CARROT: CropParams = CropParams {
        ndvi_base: 0.6,
        soil_base: 0.4,
        temp_base: 18.0,
    };

    /// Baselines for a known crop label.
    pub fn lookup(crop_type: &str) -> Option<CropParams> {
        let params = match crop_type {
            "carrot" => Self::CARROT,
            "tomato" => CropParams {
                ndvi_base: 0.7,
                soil_base: 0.5,
                temp_base: 22.0,
            },
            "lettuce" => CropParams {
                ndvi_base: 0.5,
                soil_base: 0.6,
                temp_base: 16.0,
            },
            "corn" => CropParams {
                ndvi_base: 0.8,
                soil_base: 0.4,
                temp_base: 24.0,
            },
            _ => return None,
        };
        Some(params)
    }

    /// Baselines for any crop label, falling back to carrot.
    pub fn for_crop(crop_type: &str) -> CropParams {
        Self::lookup(crop_type).unwrap_or_else(|| {
            tracing::debug!(crop_type, "Unknown crop type, using carrot baselines");
            Self::CARROT
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tomato_baselines() {
        let p = CropParams::for_crop("tomato");
        assert_eq!(p.ndvi_base, 0.7);
        assert_eq!(p.soil_base, 0.5);
        assert_eq!(p.temp_base, 22.0);
    }

    #[test]
    fn test_unknown_crop_falls_back_to_carrot() {
        assert_eq!(CropParams::lookup("wheat"), None);
        let p = CropParams::for_crop("wheat");
        assert_eq!(p, CropParams::CARROT);
        assert_eq!((p.ndvi_base, p.soil_base, p.temp_base), (0.6, 0.4, 18.0));
    }

    #[test]
    fn test_all_known_crops_resolve() {
        for crop in KNOWN_CROPS {
            assert!(CropParams::lookup(crop).is_some(), "{}", crop);
        }
    }
}
