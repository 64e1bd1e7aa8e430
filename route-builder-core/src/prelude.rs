pub use crate::PROXIMITY_TOLERANCE_M;

// Re-export key components
pub use crate::algo::{
    ContiguousChain, DistanceUnit, Marker, MarkerKind, Orientation, RouteSummary,
    compute_contiguous_chains, format_distance, orient_new_edge, plan_markers, recompute,
    total_distance,
};
pub use crate::context::{MAX_PENDING_ACTIVITIES, RouteBuilderContext};
pub use crate::loading::{LoadReport, RejectedFeature, RouteBuilderConfig, load_street_graph};
pub use crate::model::{Region, Route, RouteEdge, SelectionState, StreetEdge, StreetGraph};
pub use crate::output::{ExportedStreet, markers_to_geojson, route_to_geojson, to_export_list};
pub use crate::persistence::{
    Activity, RouteStore, SaveOutcome, SaveReceipt, SaveRequest, SaveResponse, explore_url,
};
pub use crate::selection::{RejectReason, SelectionEvent, SelectionStateMachine, Transition};

// Core identifier types
pub use crate::Error;
pub use crate::RegionId;
pub use crate::RouteId;
pub use crate::StreetEdgeId;
