//! Derived computations over the current route
//!
//! Everything here is a pure function of the route: chains are regrouped from
//! scratch after every mutation and nothing is cached between calls.

pub mod contiguity;
pub mod distance;
pub mod markers;
pub mod orientation;
pub mod summary;

pub use contiguity::{ContiguousChain, compute_contiguous_chains};
pub use distance::{DistanceUnit, edge_length_m, format_distance, total_distance};
pub use markers::{Marker, MarkerKind, plan_markers};
pub use orientation::{Orientation, orient_new_edge};
pub use summary::{RouteSummary, recompute};
