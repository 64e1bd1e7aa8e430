//! Full recomputation of everything derived from the route

use crate::loading::RouteBuilderConfig;
use crate::model::Route;
use crate::output::{ExportedStreet, to_export_list};
use crate::StreetEdgeId;

use super::{DistanceUnit, Marker, compute_contiguous_chains, plan_markers, total_distance};

/// Snapshot of the derived route state after one mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSummary {
    /// Edge ids per contiguous chain, in chain order
    pub chains: Vec<Vec<StreetEdgeId>>,
    pub distance: f64,
    pub unit: DistanceUnit,
    pub markers: Vec<Marker>,
    pub export: Vec<ExportedStreet>,
}

impl RouteSummary {
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Whether the route can be walked without interruption
    pub fn is_contiguous(&self) -> bool {
        self.chains.len() <= 1
    }
}

/// Regroups the route and derives distance, markers and export list from the
/// fresh partition.
pub fn recompute(route: &Route, config: &RouteBuilderConfig) -> RouteSummary {
    let chains = compute_contiguous_chains(route.edges(), config.proximity_tolerance_m);

    let summary = RouteSummary {
        chains: chains.iter().map(|chain| chain.street_ids()).collect(),
        distance: total_distance(route.edges(), config.distance_unit),
        unit: config.distance_unit,
        markers: plan_markers(&chains, &config.palette),
        export: to_export_list(&chains),
    };

    log::debug!(
        "Route of {} street(s) in {} chain(s), {:.3} {}",
        route.len(),
        summary.chain_count(),
        summary.distance,
        summary.unit
    );

    summary
}
