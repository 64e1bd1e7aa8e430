//! Data model for route building
//!
//! Contains the immutable street graph and the mutable route assembled on top of it.

pub mod graph;
pub mod route;
pub mod streets;

pub use graph::StreetGraph;
pub use route::{Route, RouteEdge, SelectionState};
pub use streets::{Region, StreetEdge};
