use serde::{Deserialize, Serialize};

use crate::StreetEdgeId;
use crate::algo::ContiguousChain;
use crate::model::SelectionState;

/// One street of a saved route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportedStreet {
    pub street_id: StreetEdgeId,
    /// The user flipped the street to `ChosenReversed`
    pub reverse: bool,
}

/// Flattens chains into the walking order: chain by chain, then edge by edge
/// within a chain. Insertion order is not preserved.
pub fn to_export_list(chains: &[ContiguousChain<'_>]) -> Vec<ExportedStreet> {
    chains
        .iter()
        .flat_map(|chain| chain.edges().iter())
        .map(|edge| ExportedStreet {
            street_id: edge.id(),
            reverse: edge.state() == SelectionState::ChosenReversed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::model::{RouteEdge, StreetEdge};
    use crate::{PROXIMITY_TOLERANCE_M, compute_contiguous_chains};

    fn route_edge(id: StreetEdgeId, from: (f64, f64), to: (f64, f64)) -> RouteEdge {
        let geometry = line_string![(x: from.0, y: from.1), (x: to.0, y: to.1)];
        RouteEdge::new(StreetEdge::new(id, 1, geometry).unwrap())
    }

    #[test]
    fn follows_chain_order_not_insertion_order() {
        let a = route_edge(1, (0.000, 0.0), (0.001, 0.0));
        let b = route_edge(2, (0.001, 0.0), (0.002, 0.0));
        let c = route_edge(3, (0.010, 0.0), (0.011, 0.0));
        // added A, C, B; walked as [A, B], [C]
        let edges = vec![a, c, b];

        let chains = compute_contiguous_chains(&edges, PROXIMITY_TOLERANCE_M);
        assert_eq!(
            to_export_list(&chains),
            vec![
                ExportedStreet { street_id: 1, reverse: false },
                ExportedStreet { street_id: 2, reverse: false },
                ExportedStreet { street_id: 3, reverse: false },
            ]
        );
    }

    #[test]
    fn marks_flipped_streets() {
        let mut a = route_edge(1, (0.001, 0.0), (0.0, 0.0));
        a.reverse();
        a.set_state(SelectionState::ChosenReversed);
        let chains = compute_contiguous_chains(std::slice::from_ref(&a), PROXIMITY_TOLERANCE_M);

        assert_eq!(
            to_export_list(&chains),
            vec![ExportedStreet { street_id: 1, reverse: true }]
        );
    }

    #[test]
    fn reverse_follows_state_not_geometry() {
        // reversed at add time, still Chosen
        let mut a = route_edge(1, (0.001, 0.0), (0.0, 0.0));
        a.reverse();
        let chains = compute_contiguous_chains(std::slice::from_ref(&a), PROXIMITY_TOLERANCE_M);

        assert_eq!(
            to_export_list(&chains),
            vec![ExportedStreet { street_id: 1, reverse: false }]
        );
    }

    #[test]
    fn serializes_to_save_contract_shape() {
        let street = ExportedStreet { street_id: 42, reverse: true };
        assert_eq!(
            serde_json::to_string(&street).unwrap(),
            r#"{"street_id":42,"reverse":true}"#
        );
    }
}
