//! Raw `GeoJSON` records as they come from the map loader

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawFeatureCollection {
    pub features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawStreetFeature {
    pub properties: RawStreetProperties,
    pub geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
pub struct RawStreetProperties {
    pub street_edge_id: u64,
    pub region_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct RawRegionFeature {
    pub properties: RawRegionProperties,
    pub geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
pub struct RawRegionProperties {
    pub region_id: u32,
    #[serde(default)]
    pub region_name: Option<String>,
}

/// Positions may carry an altitude; only lon/lat are used
pub type RawPosition = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum RawGeometry {
    LineString {
        coordinates: Vec<RawPosition>,
    },
    Polygon {
        coordinates: Vec<Vec<RawPosition>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<RawPosition>>>,
    },
}

impl RawGeometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            RawGeometry::LineString { .. } => "LineString",
            RawGeometry::Polygon { .. } => "Polygon",
            RawGeometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }
}
