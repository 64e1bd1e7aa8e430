//! Geodesic lengths in the unit the host displays

use std::fmt;

use geo::{Coord, Distance, Haversine, LineString, Point};
use serde::{Deserialize, Serialize};

use crate::model::RouteEdge;

const METERS_PER_MILE: f64 = 1609.344;
const METERS_PER_FOOT: f64 = 0.3048;

/// Linear unit for route lengths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Meters,
    #[default]
    Kilometers,
    Miles,
    Feet,
}

impl DistanceUnit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Meters => 1.0,
            DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::Miles => METERS_PER_MILE,
            DistanceUnit::Feet => METERS_PER_FOOT,
        }
    }

    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters_per_unit()
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            DistanceUnit::Meters => "m",
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "mi",
            DistanceUnit::Feet => "ft",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl std::str::FromStr for DistanceUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "meters" => Ok(DistanceUnit::Meters),
            "km" | "kilometers" => Ok(DistanceUnit::Kilometers),
            "mi" | "miles" => Ok(DistanceUnit::Miles),
            "ft" | "feet" => Ok(DistanceUnit::Feet),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown distance unit '{other}'"
            ))),
        }
    }
}

/// Haversine length of a polyline in meters
pub fn edge_length_m(line: &LineString<f64>) -> f64 {
    line.lines()
        .map(|segment| Haversine.distance(Point::from(segment.start), Point::from(segment.end)))
        .sum()
}

/// Sum of the lengths of all route edges, converted to `unit`.
///
/// Orientation and chain grouping do not affect the result.
pub fn total_distance(edges: &[RouteEdge], unit: DistanceUnit) -> f64 {
    let meters: f64 = edges.iter().map(|edge| edge_length_m(edge.geometry())).sum();
    unit.from_meters(meters)
}

/// Route length readout, two decimals
pub fn format_distance(value: f64, unit: DistanceUnit) -> String {
    format!("{value:.2} {unit}")
}

/// Whether two endpoints count as connected
pub(crate) fn within_tolerance(a: Coord<f64>, b: Coord<f64>, tolerance_m: f64) -> bool {
    Haversine.distance(Point::from(a), Point::from(b)) < tolerance_m
}
