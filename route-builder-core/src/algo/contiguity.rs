//! Grouping of route edges into contiguous chains
//!
//! Edges are chained greedily in insertion order: the chain under construction
//! is extended by the earliest added remaining edge whose start touches the
//! chain's end. The earliest match wins even if a later one is geometrically
//! closer, which keeps the partition a function of insertion order alone.

use std::collections::VecDeque;

use geo::Coord;

use crate::StreetEdgeId;
use crate::model::RouteEdge;

use super::distance::within_tolerance;

/// Run of route edges connected end to start
///
/// A chain is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ContiguousChain<'a> {
    edges: Vec<&'a RouteEdge>,
}

impl<'a> ContiguousChain<'a> {
    fn starting_with(edge: &'a RouteEdge) -> Self {
        Self { edges: vec![edge] }
    }

    pub fn edges(&self) -> &[&'a RouteEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn first_edge(&self) -> &'a RouteEdge {
        self.edges[0]
    }

    pub fn last_edge(&self) -> &'a RouteEdge {
        self.edges[self.edges.len() - 1]
    }

    /// First point of the chain
    pub fn start(&self) -> Coord<f64> {
        self.first_edge().start()
    }

    /// Last point of the chain
    pub fn end(&self) -> Coord<f64> {
        self.last_edge().end()
    }

    pub fn street_ids(&self) -> Vec<StreetEdgeId> {
        self.edges.iter().map(|edge| edge.id()).collect()
    }
}

/// Partitions `edges` (in insertion order) into maximal contiguous chains.
///
/// Chains are returned in the order they were closed. Every edge appears in
/// exactly one chain. Quadratic in the number of edges.
pub fn compute_contiguous_chains(edges: &[RouteEdge], tolerance_m: f64) -> Vec<ContiguousChain<'_>> {
    let mut remaining: VecDeque<&RouteEdge> = edges.iter().collect();
    let mut chains = Vec::new();

    while let Some(first) = remaining.pop_front() {
        let mut chain = ContiguousChain::starting_with(first);

        while let Some(idx) = remaining
            .iter()
            .position(|candidate| within_tolerance(chain.end(), candidate.start(), tolerance_m))
        {
            if let Some(next) = remaining.remove(idx) {
                chain.edges.push(next);
            }
        }

        log::trace!("Closed chain {:?}", chain.street_ids());
        chains.push(chain);
    }

    chains
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::PROXIMITY_TOLERANCE_M;
    use crate::model::StreetEdge;

    // Points ~111 m apart along the equator
    const P1: (f64, f64) = (0.000, 0.0);
    const P2: (f64, f64) = (0.001, 0.0);
    const P3: (f64, f64) = (0.002, 0.0);
    const P4: (f64, f64) = (0.003, 0.0);
    const P5: (f64, f64) = (0.004, 0.0);
    const P6: (f64, f64) = (0.005, 0.0);

    fn route_edge(id: StreetEdgeId, from: (f64, f64), to: (f64, f64)) -> RouteEdge {
        let geometry = line_string![(x: from.0, y: from.1), (x: to.0, y: to.1)];
        RouteEdge::new(StreetEdge::new(id, 1, geometry).unwrap())
    }

    fn chain_ids(chains: &[ContiguousChain<'_>]) -> Vec<Vec<StreetEdgeId>> {
        chains.iter().map(ContiguousChain::street_ids).collect()
    }

    #[test]
    fn empty_route_has_no_chains() {
        assert!(compute_contiguous_chains(&[], PROXIMITY_TOLERANCE_M).is_empty());
    }

    #[test]
    fn connected_edges_form_one_chain() {
        let edges = vec![route_edge(1, P1, P2), route_edge(2, P2, P3)];
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        assert_eq!(chain_ids(&chains), vec![vec![1, 2]]);
    }

    #[test]
    fn disconnected_edges_form_singletons() {
        let edges = vec![route_edge(1, P1, P2), route_edge(3, P5, P6)];
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        assert_eq!(chain_ids(&chains), vec![vec![1], vec![3]]);
    }

    #[test]
    fn bridging_edge_joins_fragments() {
        let edges = vec![
            route_edge(1, P1, P2),
            route_edge(3, P5, P6),
            route_edge(2, P2, P5),
        ];
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        assert_eq!(chain_ids(&chains), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn earliest_added_candidate_wins() {
        // Both 2 and 3 start at P2; 2 was added first so it extends the chain.
        let edges = vec![
            route_edge(1, P1, P2),
            route_edge(2, P2, P3),
            route_edge(3, P2, P4),
        ];
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        assert_eq!(chain_ids(&chains), vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn earlier_candidate_beats_nearer_one() {
        // Edge 2 starts ~8 m from P2, edge 3 starts exactly at P2.
        let offset = (P2.0 + 0.00007, 0.0);
        let edges = vec![
            route_edge(1, P1, P2),
            route_edge(2, offset, P3),
            route_edge(3, P2, P4),
        ];
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        assert_eq!(chain_ids(&chains), vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn chain_grows_only_from_its_end() {
        // Edge 2 would precede edge 1, but chains only extend forward.
        let edges = vec![route_edge(1, P2, P3), route_edge(2, P1, P2)];
        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        assert_eq!(chain_ids(&chains), vec![vec![1], vec![2]]);
    }

    #[test]
    fn every_edge_lands_in_exactly_one_chain() {
        let points = [P1, P2, P3, P4, P5, P6];
        let mut edges = Vec::new();
        let mut id = 0;
        // Every directed pair of distinct points, in a scrambled but fixed order.
        for step in [3, 1, 4, 2, 5] {
            for i in 0..points.len() {
                let j = (i + step) % points.len();
                edges.push(route_edge(id, points[i], points[j]));
                id += 1;
            }
        }

        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        let mut seen: Vec<StreetEdgeId> = chains.iter().flat_map(ContiguousChain::street_ids).collect();
        seen.sort_unstable();

        let mut expected: Vec<StreetEdgeId> = edges.iter().map(RouteEdge::id).collect();
        expected.sort_unstable();
        assert_eq!(seen, expected);

        for chain in &chains {
            for pair in chain.edges().windows(2) {
                assert!(within_tolerance(
                    pair[0].end(),
                    pair[1].start(),
                    PROXIMITY_TOLERANCE_M
                ));
            }
        }
    }
}
