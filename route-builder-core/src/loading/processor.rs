use std::fmt;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use hashbrown::{HashMap, HashSet};
use log::{info, warn};

use super::raw_types::{
    RawFeatureCollection, RawGeometry, RawPosition, RawRegionFeature, RawStreetFeature,
};
use crate::{
    Error, RegionId, StreetEdgeId,
    model::{Region, StreetEdge, StreetGraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Street,
    Region,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Street => f.write_str("street"),
            FeatureKind::Region => f.write_str("region"),
        }
    }
}

/// Feature that was left out of the graph
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFeature {
    pub kind: FeatureKind,
    /// Position of the feature in its collection
    pub index: usize,
    pub reason: String,
}

/// Outcome of loading the input collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub streets_loaded: usize,
    pub regions_loaded: usize,
    pub rejected: Vec<RejectedFeature>,
    /// Streets tagged with a region that was not loaded
    pub streets_without_region: usize,
}

/// Builds the base graph from the street collection and, optionally, the
/// neighborhood collection.
///
/// Features are validated one by one. A malformed feature is logged, listed
/// in the report and left out of the graph, so it can never be selected.
///
/// # Errors
///
/// Returns an error only if a collection as a whole is not valid JSON or has
/// no `features` array
pub fn load_street_graph(
    streets_geojson: &str,
    regions_geojson: Option<&str>,
) -> Result<(StreetGraph, LoadReport), Error> {
    let mut report = LoadReport::default();

    let streets = parse_streets(streets_geojson, &mut report)?;
    let regions = match regions_geojson {
        Some(json) => parse_regions(json, &mut report)?,
        None => Vec::new(),
    };

    report.streets_loaded = streets.len();
    report.regions_loaded = regions.len();
    if !regions.is_empty() {
        report.streets_without_region = validate_street_regions(&streets, &regions);
    }

    info!(
        "Loaded {} streets and {} regions ({} features rejected)",
        report.streets_loaded,
        report.regions_loaded,
        report.rejected.len()
    );

    Ok((StreetGraph::new(streets, regions), report))
}

fn parse_streets(json: &str, report: &mut LoadReport) -> Result<Vec<StreetEdge>, Error> {
    let collection: RawFeatureCollection = serde_json::from_str(json)?;
    let mut seen: HashSet<StreetEdgeId> = HashSet::with_capacity(collection.features.len());
    let mut streets = Vec::with_capacity(collection.features.len());

    for (index, value) in collection.features.into_iter().enumerate() {
        match street_from_value(value) {
            Ok(street) if !seen.insert(street.id()) => {
                reject(
                    report,
                    FeatureKind::Street,
                    index,
                    format!("duplicate street_edge_id {}", street.id()),
                );
            }
            Ok(street) => streets.push(street),
            Err(e) => reject(report, FeatureKind::Street, index, e.to_string()),
        }
    }

    Ok(streets)
}

fn street_from_value(value: serde_json::Value) -> Result<StreetEdge, Error> {
    let raw: RawStreetFeature = serde_json::from_value(value)?;
    let coordinates = match raw.geometry {
        RawGeometry::LineString { coordinates } => coordinates,
        other => {
            return Err(Error::InvalidData(format!(
                "street {} has {} geometry, expected LineString",
                raw.properties.street_edge_id,
                other.type_name()
            )));
        }
    };

    let line = LineString::new(to_coords(&coordinates)?);
    StreetEdge::new(
        raw.properties.street_edge_id,
        raw.properties.region_id,
        line,
    )
}

fn parse_regions(json: &str, report: &mut LoadReport) -> Result<Vec<Region>, Error> {
    let collection: RawFeatureCollection = serde_json::from_str(json)?;
    let mut seen: HashSet<RegionId> = HashSet::with_capacity(collection.features.len());
    let mut regions = Vec::with_capacity(collection.features.len());

    for (index, value) in collection.features.into_iter().enumerate() {
        match region_from_value(value) {
            Ok(region) if !seen.insert(region.id) => {
                reject(
                    report,
                    FeatureKind::Region,
                    index,
                    format!("duplicate region_id {}", region.id),
                );
            }
            Ok(region) => regions.push(region),
            Err(e) => reject(report, FeatureKind::Region, index, e.to_string()),
        }
    }

    Ok(regions)
}

fn region_from_value(value: serde_json::Value) -> Result<Region, Error> {
    let raw: RawRegionFeature = serde_json::from_value(value)?;
    let geometry = match raw.geometry {
        RawGeometry::Polygon { coordinates } => MultiPolygon::new(vec![to_polygon(&coordinates)?]),
        RawGeometry::MultiPolygon { coordinates } => MultiPolygon::new(
            coordinates
                .iter()
                .map(|rings| to_polygon(rings))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        other => {
            return Err(Error::InvalidData(format!(
                "region {} has {} geometry, expected Polygon or MultiPolygon",
                raw.properties.region_id,
                other.type_name()
            )));
        }
    };

    Ok(Region {
        id: raw.properties.region_id,
        name: raw.properties.region_name,
        geometry,
    })
}

fn to_polygon(rings: &[Vec<RawPosition>]) -> Result<Polygon<f64>, Error> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or_else(|| Error::InvalidData("polygon without rings".to_string()))?;

    let exterior = LineString::new(to_coords(exterior)?);
    if exterior.0.len() < 4 {
        return Err(Error::InvalidData(format!(
            "polygon ring has {} positions, at least 4 are required",
            exterior.0.len()
        )));
    }

    let interiors = interiors
        .iter()
        .map(|ring| to_coords(ring).map(LineString::new))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn to_coords(positions: &[RawPosition]) -> Result<Vec<Coord<f64>>, Error> {
    positions
        .iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
            _ => Err(Error::InvalidData(format!(
                "invalid position {position:?}"
            ))),
        })
        .collect()
}

fn reject(report: &mut LoadReport, kind: FeatureKind, index: usize, reason: String) {
    warn!("Rejecting {kind} feature #{index}: {reason}");
    report.rejected.push(RejectedFeature {
        kind,
        index,
        reason,
    });
}

#[allow(clippy::cast_precision_loss)]
fn validate_street_regions(streets: &[StreetEdge], regions: &[Region]) -> usize {
    let known: HashMap<RegionId, &Region> =
        regions.iter().map(|region| (region.id, region)).collect();

    let without_region = streets
        .iter()
        .filter(|street| !known.contains_key(&street.region_id()))
        .count();

    let outside_region = streets
        .iter()
        .filter(|street| {
            known
                .get(&street.region_id())
                .is_some_and(|region| !region.covers_street(street))
        })
        .count();

    let total = streets.len();
    if without_region > 0 {
        let percentage = (without_region as f64 / total as f64) * 100.0;
        warn!(
            "{without_region} of {total} streets ({percentage:.1}%) reference a region that \
        was not loaded. They can still be selected, but their neighborhood cannot be highlighted."
        );
    }
    if outside_region > 0 {
        warn!(
            "{outside_region} of {total} streets do not intersect the polygon of their region"
        );
    }

    without_region
}
