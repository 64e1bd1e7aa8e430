//! Street network components - directed edges and neighborhoods

use geo::{Coord, Intersects, LineString, MultiPolygon, Point};

use crate::{Error, RegionId, StreetEdgeId};

/// Directed street segment
///
/// The polyline order is significant: `start` is the first point and `end`
/// the last one. A street edge always has at least two finite points.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetEdge {
    id: StreetEdgeId,
    region_id: RegionId,
    geometry: LineString<f64>,
}

impl StreetEdge {
    /// Creates a street edge, rejecting polylines that cannot be walked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the polyline has fewer than two points
    /// or contains a non-finite coordinate.
    pub fn new(
        id: StreetEdgeId,
        region_id: RegionId,
        geometry: LineString<f64>,
    ) -> Result<Self, Error> {
        if geometry.0.len() < 2 {
            return Err(Error::InvalidData(format!(
                "street edge {id} has {} point(s), at least 2 are required",
                geometry.0.len()
            )));
        }
        if !geometry.0.iter().all(|c| c.x.is_finite() && c.y.is_finite()) {
            return Err(Error::InvalidData(format!(
                "street edge {id} contains non-finite coordinates"
            )));
        }

        Ok(Self {
            id,
            region_id,
            geometry,
        })
    }

    pub fn id(&self) -> StreetEdgeId {
        self.id
    }

    pub fn region_id(&self) -> RegionId {
        self.region_id
    }

    pub fn geometry(&self) -> &LineString<f64> {
        &self.geometry
    }

    /// First point of the polyline
    pub fn start(&self) -> Coord<f64> {
        self.geometry.0[0]
    }

    /// Last point of the polyline
    pub fn end(&self) -> Coord<f64> {
        self.geometry.0[self.geometry.0.len() - 1]
    }

    /// Second point of the polyline, used to orient the start marker
    pub fn second(&self) -> Coord<f64> {
        self.geometry.0[1]
    }

    /// Reverses the polyline in place
    pub(crate) fn reverse(&mut self) {
        self.geometry.0.reverse();
    }
}

/// Neighborhood polygon that scopes a route
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        self.geometry.intersects(point)
    }

    pub fn covers_street(&self, street: &StreetEdge) -> bool {
        self.geometry.intersects(street.geometry())
    }
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;

    #[test]
    fn rejects_single_point_polyline() {
        let geometry = line_string![(x: 0.0, y: 0.0)];
        assert!(matches!(
            StreetEdge::new(1, 1, geometry),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let geometry = line_string![(x: 0.0, y: 0.0), (x: f64::NAN, y: 1.0)];
        assert!(StreetEdge::new(1, 1, geometry).is_err());
    }

    #[test]
    fn reverse_swaps_endpoints() {
        let geometry = line_string![(x: 0.0, y: 0.0), (x: 0.5, y: 0.5), (x: 1.0, y: 1.0)];
        let mut edge = StreetEdge::new(7, 3, geometry).unwrap();
        edge.reverse();

        assert_eq!(edge.start(), Coord { x: 1.0, y: 1.0 });
        assert_eq!(edge.end(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(edge.second(), Coord { x: 0.5, y: 0.5 });
    }
}
