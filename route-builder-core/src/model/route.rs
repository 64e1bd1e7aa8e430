//! Route assembled by the user, in insertion order

use std::fmt;

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::{RegionId, StreetEdgeId};

use super::StreetEdge;

/// Selection state of a single street edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    NotChosen,
    Chosen,
    ChosenReversed,
}

impl SelectionState {
    /// State reached by clicking an edge in this state, ignoring region locks
    pub fn next(self) -> Self {
        match self {
            SelectionState::NotChosen => SelectionState::Chosen,
            SelectionState::Chosen => SelectionState::ChosenReversed,
            SelectionState::ChosenReversed => SelectionState::NotChosen,
        }
    }

    pub fn is_chosen(self) -> bool {
        self != SelectionState::NotChosen
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SelectionState::NotChosen => "not chosen",
            SelectionState::Chosen => "chosen",
            SelectionState::ChosenReversed => "chosen reversed",
        }
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Street edge taken into the route
///
/// Holds its own copy of the edge so that orientation changes never touch the
/// base graph.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEdge {
    edge: StreetEdge,
    state: SelectionState,
    reversed_from_source: bool,
}

impl RouteEdge {
    pub(crate) fn new(edge: StreetEdge) -> Self {
        Self {
            edge,
            state: SelectionState::Chosen,
            reversed_from_source: false,
        }
    }

    pub fn id(&self) -> StreetEdgeId {
        self.edge.id()
    }

    pub fn region_id(&self) -> RegionId {
        self.edge.region_id()
    }

    pub fn edge(&self) -> &StreetEdge {
        &self.edge
    }

    /// Polyline in its current orientation
    pub fn geometry(&self) -> &LineString<f64> {
        self.edge.geometry()
    }

    pub fn start(&self) -> Coord<f64> {
        self.edge.start()
    }

    pub fn end(&self) -> Coord<f64> {
        self.edge.end()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Whether the polyline currently runs against the source orientation
    pub fn reversed_from_source(&self) -> bool {
        self.reversed_from_source
    }

    /// Reverses the polyline and records the flip against the source
    pub(crate) fn reverse(&mut self) {
        self.edge.reverse();
        self.reversed_from_source = !self.reversed_from_source;
    }

    pub(crate) fn set_state(&mut self, state: SelectionState) {
        self.state = state;
    }
}

/// Ordered set of chosen edges plus the neighborhood they are locked to
///
/// The route is empty exactly when no region is active, and every edge in it
/// belongs to the active region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    edges: Vec<RouteEdge>,
    active_region: Option<RegionId>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[RouteEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn active_region(&self) -> Option<RegionId> {
        self.active_region
    }

    /// Edge ids in insertion order
    pub fn street_ids(&self) -> Vec<StreetEdgeId> {
        self.edges.iter().map(RouteEdge::id).collect()
    }

    pub fn position(&self, id: StreetEdgeId) -> Option<usize> {
        self.edges.iter().position(|edge| edge.id() == id)
    }

    pub fn get(&self, id: StreetEdgeId) -> Option<&RouteEdge> {
        self.edges.iter().find(|edge| edge.id() == id)
    }

    pub fn state_of(&self, id: StreetEdgeId) -> SelectionState {
        self.get(id)
            .map_or(SelectionState::NotChosen, RouteEdge::state)
    }

    pub(crate) fn get_mut(&mut self, id: StreetEdgeId) -> Option<&mut RouteEdge> {
        self.edges.iter_mut().find(|edge| edge.id() == id)
    }

    pub(crate) fn push(&mut self, edge: RouteEdge) {
        if self.edges.is_empty() {
            self.active_region = Some(edge.region_id());
        }
        self.edges.push(edge);
    }

    pub(crate) fn remove(&mut self, id: StreetEdgeId) -> Option<RouteEdge> {
        let idx = self.position(id)?;
        let removed = self.edges.remove(idx);
        if self.edges.is_empty() {
            self.active_region = None;
        }
        Some(removed)
    }

    pub(crate) fn clear(&mut self) {
        self.edges.clear();
        self.active_region = None;
    }
}
