//! Interactive route building over a directed street graph.
//!
//! A user assembles a walking route by clicking street edges. Every click is
//! one transition of the [`SelectionStateMachine`]; after each transition the
//! chosen edges are regrouped into contiguous chains, from which the total
//! distance, the chain boundary markers and the export list are derived.

pub mod algo;
pub mod context;
mod error;
pub mod loading;
pub mod model;
pub mod output;
pub mod persistence;
pub mod prelude;
pub mod selection;

pub use error::Error;

pub use algo::{
    ContiguousChain, DistanceUnit, Marker, MarkerKind, Orientation, RouteSummary,
    compute_contiguous_chains, orient_new_edge, plan_markers, recompute, total_distance,
};
pub use context::{MAX_PENDING_ACTIVITIES, RouteBuilderContext};
pub use loading::{LoadReport, RouteBuilderConfig, load_street_graph};
pub use model::{Region, Route, RouteEdge, SelectionState, StreetEdge, StreetGraph};
pub use output::{ExportedStreet, to_export_list};
pub use selection::{RejectReason, SelectionEvent, SelectionStateMachine, Transition};

/// Identifier of a street edge (`street_edge_id`)
pub type StreetEdgeId = u64;
/// Identifier of a neighborhood (`region_id`)
pub type RegionId = u32;
/// Identifier handed back by the route store after a successful save
pub type RouteId = u64;

/// Endpoints closer than this many meters are treated as connected
pub const PROXIMITY_TOLERANCE_M: f64 = 10.0;
