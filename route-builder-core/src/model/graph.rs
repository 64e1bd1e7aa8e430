//! Immutable base graph of selectable street edges

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Line};

use crate::{Error, RegionId, StreetEdgeId};

use super::{Region, StreetEdge};

/// Segment of a street polyline tagged with the index of its edge
pub type IndexedSegment = GeomWithData<Line<[f64; 2]>, usize>;

/// Street edges and neighborhoods loaded once per map
///
/// Only edges that passed validation at load time live here, so anything
/// that is not in the graph can never be selected.
#[derive(Debug, Clone)]
pub struct StreetGraph {
    edges: Vec<StreetEdge>,
    edge_index: HashMap<StreetEdgeId, usize>,
    regions: Vec<Region>,
    region_index: HashMap<RegionId, usize>,
    rtree: RTree<IndexedSegment>,
}

impl StreetGraph {
    /// Builds the graph and its lookup indices.
    ///
    /// Later duplicates of an already seen edge or region id are dropped.
    pub fn new(edges: Vec<StreetEdge>, regions: Vec<Region>) -> Self {
        let mut unique_edges = Vec::with_capacity(edges.len());
        let mut edge_index = HashMap::with_capacity(edges.len());
        for edge in edges {
            if edge_index.contains_key(&edge.id()) {
                log::warn!("Dropping duplicate street edge {}", edge.id());
                continue;
            }
            edge_index.insert(edge.id(), unique_edges.len());
            unique_edges.push(edge);
        }

        let mut unique_regions = Vec::with_capacity(regions.len());
        let mut region_index = HashMap::with_capacity(regions.len());
        for region in regions {
            if region_index.contains_key(&region.id) {
                log::warn!("Dropping duplicate region {}", region.id);
                continue;
            }
            region_index.insert(region.id, unique_regions.len());
            unique_regions.push(region);
        }

        let rtree = build_rtree(&unique_edges);

        Self {
            edges: unique_edges,
            edge_index,
            regions: unique_regions,
            region_index,
            rtree,
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[StreetEdge] {
        &self.edges
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn edge(&self, id: StreetEdgeId) -> Option<&StreetEdge> {
        self.edge_index.get(&id).map(|&idx| &self.edges[idx])
    }

    /// Same as [`StreetGraph::edge`] but fails for ids that are not loaded
    pub fn try_edge(&self, id: StreetEdgeId) -> Result<&StreetEdge, Error> {
        self.edge(id).ok_or(Error::UnknownStreet(id))
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.region_index.get(&id).map(|&idx| &self.regions[idx])
    }

    /// Edges belonging to the given neighborhood
    pub fn streets_in_region(&self, id: RegionId) -> impl Iterator<Item = &StreetEdge> {
        self.edges.iter().filter(move |edge| edge.region_id() == id)
    }

    /// Street closest to `point`, if one lies within `max_distance_m` meters.
    ///
    /// Candidate lookup is planar on lon/lat, which is adequate for picking
    /// the edge under a cursor; the cutoff itself is checked with haversine.
    pub fn nearest_edge(&self, point: &Point<f64>, max_distance_m: f64) -> Option<&StreetEdge> {
        let query = [point.x(), point.y()];
        let segment = self.rtree.nearest_neighbor(&query)?;
        let [x, y] = segment.geom().nearest_point(&query);
        let distance = Haversine.distance(*point, Point::new(x, y));

        if distance <= max_distance_m {
            Some(&self.edges[segment.data])
        } else {
            log::trace!(
                "Nearest street to {point:?} is {distance:.1} m away (max: {max_distance_m} m)"
            );
            None
        }
    }
}

fn build_rtree(edges: &[StreetEdge]) -> RTree<IndexedSegment> {
    let segments = edges
        .iter()
        .enumerate()
        .flat_map(|(idx, edge)| {
            edge.geometry().lines().map(move |line| {
                GeomWithData::new(
                    Line::new([line.start.x, line.start.y], [line.end.x, line.end.y]),
                    idx,
                )
            })
        })
        .collect();

    RTree::bulk_load(segments)
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;

    fn edge(id: StreetEdgeId, from: (f64, f64), to: (f64, f64)) -> StreetEdge {
        StreetEdge::new(
            id,
            1,
            line_string![(x: from.0, y: from.1), (x: to.0, y: to.1)],
        )
        .unwrap()
    }

    #[test]
    fn keeps_first_of_duplicate_ids() {
        let graph = StreetGraph::new(
            vec![
                edge(1, (0.0, 0.0), (0.001, 0.0)),
                edge(1, (1.0, 1.0), (1.001, 1.0)),
            ],
            Vec::new(),
        );

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edge(1).unwrap().start().x, 0.0);
    }

    #[test]
    fn unknown_edge_is_an_error() {
        let graph = StreetGraph::new(vec![edge(1, (0.0, 0.0), (0.001, 0.0))], Vec::new());
        assert!(matches!(graph.try_edge(2), Err(Error::UnknownStreet(2))));
    }

    #[test]
    fn nearest_edge_respects_cutoff() {
        let graph = StreetGraph::new(
            vec![
                edge(1, (0.0, 0.0), (0.001, 0.0)),
                edge(2, (0.0, 0.01), (0.001, 0.01)),
            ],
            Vec::new(),
        );

        // ~5.5 m north of edge 1
        let near = Point::new(0.0005, 0.00005);
        assert_eq!(graph.nearest_edge(&near, 25.0).map(StreetEdge::id), Some(1));

        // ~110 m away from both
        let far = Point::new(0.0005, 0.005);
        assert!(graph.nearest_edge(&far, 25.0).is_none());
    }
}
