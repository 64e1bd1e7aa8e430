//! Start, boundary and end markers for the resolved chains

use geo::{Bearing, Coord, Haversine, Point};
use itertools::Itertools;
use serde::Serialize;

use super::ContiguousChain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Start,
    Boundary,
    End,
}

impl MarkerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerKind::Start => "start",
            MarkerKind::Boundary => "boundary",
            MarkerKind::End => "end",
        }
    }
}

/// Marker placement handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coord<f64>,
    /// Degrees clockwise from north, start marker only
    pub bearing: Option<f64>,
    /// 1-based boundary index, shared by both markers of a boundary pair
    pub label: Option<usize>,
    pub color: Option<String>,
}

impl Marker {
    fn start(position: Coord<f64>, toward: Coord<f64>) -> Self {
        let bearing = Haversine
            .bearing(Point::from(position), Point::from(toward))
            .rem_euclid(360.0);
        Self {
            kind: MarkerKind::Start,
            position,
            bearing: Some(bearing),
            label: None,
            color: None,
        }
    }

    fn boundary(position: Coord<f64>, label: usize, color: Option<String>) -> Self {
        Self {
            kind: MarkerKind::Boundary,
            position,
            bearing: None,
            label: Some(label),
            color,
        }
    }

    fn end(position: Coord<f64>) -> Self {
        Self {
            kind: MarkerKind::End,
            position,
            bearing: None,
            label: None,
            color: None,
        }
    }
}

/// Plans the markers for `chains`.
///
/// Each gap between consecutive chains yields a matched pair of boundary
/// markers, one where the earlier chain stops and one where the next resumes,
/// with the same label and color. An empty palette leaves boundary markers
/// uncolored.
pub fn plan_markers(chains: &[ContiguousChain<'_>], palette: &[String]) -> Vec<Marker> {
    let (Some(first), Some(last)) = (chains.first(), chains.last()) else {
        return Vec::new();
    };

    let mut markers = Vec::with_capacity(2 * chains.len());

    let first_edge = first.first_edge().edge();
    markers.push(Marker::start(first_edge.start(), first_edge.second()));

    for (idx, (before, after)) in chains.iter().tuple_windows().enumerate() {
        let label = idx + 1;
        let color = (!palette.is_empty()).then(|| palette[idx % palette.len()].clone());

        markers.push(Marker::boundary(before.end(), label, color.clone()));
        markers.push(Marker::boundary(after.start(), label, color));
    }

    markers.push(Marker::end(last.end()));

    markers
}
