use thiserror::Error;

use crate::StreetEdgeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown street edge: {0}")]
    UnknownStreet(StreetEdgeId),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to save route: {0}")]
    Persistence(String),
}
