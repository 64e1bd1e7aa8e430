//! Boundary to the collaborator that stores finished routes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, RegionId, RouteId, output::ExportedStreet};

/// Body of a save request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub region_id: RegionId,
    pub streets: Vec<ExportedStreet>,
}

impl SaveRequest {
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Body of a successful save response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub route_id: RouteId,
}

impl SaveResponse {
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Transport that persists a route and hands back its id
///
/// Implementations own retries, if any. A failed save must leave nothing
/// committed on the caller's side.
pub trait RouteStore {
    fn save(&mut self, request: &SaveRequest) -> Result<SaveResponse, Error>;
}

impl<F> RouteStore for F
where
    F: FnMut(&SaveRequest) -> Result<SaveResponse, Error>,
{
    fn save(&mut self, request: &SaveRequest) -> Result<SaveResponse, Error> {
        self(request)
    }
}

/// Viewer path for a saved route
pub fn explore_url(route_id: RouteId) -> String {
    format!("/explore?routeId={route_id}")
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub route_id: RouteId,
    pub explore_url: String,
}

impl SaveReceipt {
    pub fn new(route_id: RouteId) -> Self {
        Self {
            route_id,
            explore_url: explore_url(route_id),
        }
    }

    /// Absolute link for sharing, e.g. `https://example.org/explore?routeId=3`
    pub fn share_link(&self, origin: &str) -> String {
        format!("{}{}", origin.trim_end_matches('/'), self.explore_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SaveReceipt),
    /// Nothing to save, no request issued
    SkippedEmpty,
    /// Same streets as the last successful save, no request issued
    SkippedDuplicate,
}

/// User activity reported to the host's activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    SaveEmpty,
    SaveDuplicate,
    SaveSuccess(RouteId),
    SaveError,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activity::SaveEmpty => f.write_str("RouteBuilder_Click=SaveEmpty"),
            Activity::SaveDuplicate => f.write_str("RouteBuilder_Click=SaveDuplicate"),
            Activity::SaveSuccess(route_id) => {
                write!(f, "RouteBuilder_Click=SaveSuccess_RouteId={route_id}")
            }
            Activity::SaveError => f.write_str("RouteBuilder_Click=SaveError"),
        }
    }
}
