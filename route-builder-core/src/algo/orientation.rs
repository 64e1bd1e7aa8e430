//! Orientation of a newly added edge

use crate::model::StreetEdge;

use super::{ContiguousChain, distance::within_tolerance};

/// Whether an edge keeps its stored direction when it joins the route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Keep,
    Reverse,
}

/// Chooses the direction of `new_edge` so that it extends an existing chain.
///
/// `chains` is the partition of the route before the edge is added. Chains are
/// checked from the most recently closed one backwards, and the first chain
/// whose end touches either endpoint of the edge decides. An edge touching no
/// chain keeps its direction and starts a chain of its own.
pub fn orient_new_edge(
    new_edge: &StreetEdge,
    chains: &[ContiguousChain<'_>],
    tolerance_m: f64,
) -> Orientation {
    for chain in chains.iter().rev() {
        let chain_end = chain.end();
        if within_tolerance(chain_end, new_edge.start(), tolerance_m) {
            return Orientation::Keep;
        }
        if within_tolerance(chain_end, new_edge.end(), tolerance_m) {
            return Orientation::Reverse;
        }
    }

    Orientation::Keep
}
