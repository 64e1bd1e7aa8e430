//! This module is responsible for loading the street and neighborhood
//! collections into the base graph, and for the builder configuration.

mod config;
mod processor;
mod raw_types;

pub use config::RouteBuilderConfig;
pub use processor::{FeatureKind, LoadReport, RejectedFeature, load_street_graph};
