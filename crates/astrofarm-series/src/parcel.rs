//! Parcels and the GeoJSON FeatureCollection files that carry them.

use crate::{Result, SeriesError, KNOWN_CROPS};
use astrofarm_common::AreaOfInterest;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Edge length of a demo parcel square, in degrees.
pub const DEMO_PARCEL_SIZE_DEG: f64 = 0.01;

/// Soil types assigned to demo parcels.
pub const SOIL_TYPES: [&str; 3] = ["clay", "sandy", "loam"];

/// Irrigation methods assigned to demo parcels.
pub const IRRIGATION_METHODS: [&str; 3] = ["drip", "sprinkler", "flood"];

/// Identifier of the `index`-th generated parcel.
pub fn parcel_id(index: usize) -> String {
    format!("parcel_{:03}", index)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub r#type: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub r#type: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: ParcelProperties,
}

/// GeoJSON allows `"properties": null`.
fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ParcelProperties, D::Error> {
    Ok(Option::<ParcelProperties>::deserialize(deserializer)?.unwrap_or_default())
}

/// A GeoJSON geometry. Coordinates are kept as raw JSON so any geometry
/// type passes through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub r#type: String,
    pub coordinates: Value,
}

impl Geometry {
    /// Polygon with a single outer ring of `[lon, lat]` positions.
    pub fn polygon(ring: Vec<[f64; 2]>) -> Self {
        Self {
            r#type: "Polygon".to_string(),
            coordinates: serde_json::json!([ring]),
        }
    }

    /// Outer ring of a polygon, if this is one.
    pub fn outer_ring(&self) -> Option<Vec<[f64; 2]>> {
        if self.r#type != "Polygon" {
            return None;
        }
        self.coordinates
            .get(0)?
            .as_array()?
            .iter()
            .map(|p| Some([p.get(0)?.as_f64()?, p.get(1)?.as_f64()?]))
            .collect()
    }
}

/// Feature properties, kept as raw JSON so any parcels file loads and
/// passes through unchanged. Typed accessors return `None` for values of
/// the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelProperties(Map<String, Value>);

impl ParcelProperties {
    /// Empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a property, replacing any previous value.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Parcel identifier. Numeric ids are returned in their JSON form.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn crop_type(&self) -> Option<&str> {
        self.0.get("crop_type")?.as_str()
    }

    pub fn area_ha(&self) -> Option<f64> {
        self.0.get("area_ha")?.as_f64()
    }

    pub fn soil_type(&self) -> Option<&str> {
        self.0.get("soil_type")?.as_str()
    }

    pub fn irrigation(&self) -> Option<&str> {
        self.0.get("irrigation")?.as_str()
    }
}

/// A farm parcel to generate series for.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub id: String,
    pub crop_type: String,
    pub geometry: Option<Geometry>,
    pub properties: ParcelProperties,
}

impl Parcel {
    /// Parcel from the `index`-th feature of a collection. `id` (string or
    /// number) and `crop_type` (string) are required.
    pub fn from_feature(index: usize, feature: &Feature) -> Result<Self> {
        let props = &feature.properties;
        let id = props
            .id()
            .ok_or(SeriesError::MissingProperty { index, key: "id" })?;
        let crop_type = props
            .crop_type()
            .ok_or(SeriesError::MissingProperty {
                index,
                key: "crop_type",
            })?
            .to_string();

        Ok(Self {
            id,
            crop_type,
            geometry: feature.geometry.clone(),
            properties: props.clone(),
        })
    }

    /// GeoJSON feature for this parcel.
    pub fn to_feature(&self) -> Feature {
        let mut properties = self.properties.clone();
        properties.insert("id", self.id.clone());
        properties.insert("crop_type", self.crop_type.clone());
        Feature {
            r#type: "Feature".to_string(),
            geometry: self.geometry.clone(),
            properties,
        }
    }
}

/// Wrap parcels in a FeatureCollection.
pub fn feature_collection(parcels: &[Parcel]) -> FeatureCollection {
    FeatureCollection {
        r#type: "FeatureCollection".to_string(),
        features: parcels.iter().map(Parcel::to_feature).collect(),
    }
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, choices: &[&'a str]) -> &'a str {
    choices.choose(rng).copied().unwrap_or_default()
}

/// Square demo parcels centred at uniform random points inside `aoi`.
pub fn demo_parcels<R: Rng + ?Sized>(
    rng: &mut R,
    aoi: &AreaOfInterest,
    count: usize,
) -> Vec<Parcel> {
    let half = DEMO_PARCEL_SIZE_DEG / 2.0;

    let parcels: Vec<Parcel> = (0..count)
        .map(|i| {
            let lon = rng.gen_range(aoi.west..aoi.east);
            let lat = rng.gen_range(aoi.south..aoi.north);
            let ring = vec![
                [lon - half, lat - half],
                [lon + half, lat - half],
                [lon + half, lat + half],
                [lon - half, lat + half],
                [lon - half, lat - half],
            ];

            let crop_type = pick(rng, &KNOWN_CROPS).to_string();
            let mut properties = ParcelProperties::new();
            properties.insert("id", parcel_id(i));
            properties.insert("crop_type", crop_type.clone());
            properties.insert("area_ha", rng.gen_range(10.0..100.0));
            properties.insert("soil_type", pick(rng, &SOIL_TYPES));
            properties.insert("irrigation", pick(rng, &IRRIGATION_METHODS));

            Parcel {
                id: parcel_id(i),
                crop_type,
                geometry: Some(Geometry::polygon(ring)),
                properties,
            }
        })
        .collect();

    tracing::info!(count = parcels.len(), aoi = %aoi, "Created demo parcels");
    parcels
}

/// Parcels with an id and a random crop type but no geometry.
pub fn synthetic_parcels<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Parcel> {
    (0..count)
        .map(|i| {
            let crop_type = pick(rng, &KNOWN_CROPS).to_string();
            let mut properties = ParcelProperties::new();
            properties.insert("id", parcel_id(i));
            properties.insert("crop_type", crop_type.clone());
            Parcel {
                id: parcel_id(i),
                crop_type,
                geometry: None,
                properties,
            }
        })
        .collect()
}

/// Read a GeoJSON FeatureCollection.
pub fn load_feature_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SeriesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let collection: FeatureCollection =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| SeriesError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        path = %path.display(),
        features = collection.features.len(),
        "Loaded feature collection"
    );
    Ok(collection)
}

/// Parcels of every feature, failing on the first one without `id` or
/// `crop_type`.
pub fn parcels_from_collection(collection: &FeatureCollection) -> Result<Vec<Parcel>> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(i, f)| Parcel::from_feature(i, f))
        .collect()
}
