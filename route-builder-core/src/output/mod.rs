//! Views of the resolved route handed to collaborators

mod export;
mod to_geojson;

pub use export::{ExportedStreet, to_export_list};
pub use to_geojson::{markers_to_geojson, route_to_geojson};
