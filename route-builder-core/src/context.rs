//! Per-map route builder
//!
//! [`RouteBuilderContext`] is what a host instantiates for each map. It feeds
//! clicks to the state machine and, after every change, recomputes chains,
//! distance, markers and the export list in one go, so the summary it hands
//! out always matches the route.

use std::sync::Arc;

use geo::Point;
use geojson::FeatureCollection;
use log::{error, info};

use crate::{
    Error, RegionId, StreetEdgeId,
    algo::{RouteSummary, compute_contiguous_chains, format_distance, recompute},
    loading::RouteBuilderConfig,
    model::{Route, SelectionState, StreetGraph},
    output::{ExportedStreet, markers_to_geojson, route_to_geojson},
    persistence::{Activity, RouteStore, SaveOutcome, SaveReceipt, SaveRequest},
    selection::{SelectionEvent, SelectionStateMachine, Transition},
};

/// Activities kept for a host that never drains them
pub const MAX_PENDING_ACTIVITIES: usize = 64;

#[derive(Debug, Clone)]
pub struct RouteBuilderContext {
    graph: Arc<StreetGraph>,
    config: RouteBuilderConfig,
    machine: SelectionStateMachine,
    summary: RouteSummary,
    last_saved: Option<Vec<ExportedStreet>>,
    last_receipt: Option<SaveReceipt>,
    /// Pending until drained by `take_activities`, oldest dropped past
    /// `MAX_PENDING_ACTIVITIES`
    activities: Vec<Activity>,
}

impl RouteBuilderContext {
    /// Creates an empty route builder over `graph`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(graph: Arc<StreetGraph>, config: RouteBuilderConfig) -> Result<Self, Error> {
        config.validate()?;
        let machine = SelectionStateMachine::new(config.proximity_tolerance_m);
        let summary = recompute(machine.route(), &config);

        Ok(Self {
            graph,
            config,
            machine,
            summary,
            last_saved: None,
            last_receipt: None,
            activities: Vec::new(),
        })
    }

    pub fn graph(&self) -> &StreetGraph {
        &self.graph
    }

    pub fn config(&self) -> &RouteBuilderConfig {
        &self.config
    }

    pub fn route(&self) -> &Route {
        self.machine.route()
    }

    /// Derived state as of the last transition
    pub fn summary(&self) -> &RouteSummary {
        &self.summary
    }

    /// Neighborhood the route is locked to, if any
    pub fn active_region(&self) -> Option<RegionId> {
        self.machine.active_region()
    }

    pub fn state_of(&self, id: StreetEdgeId) -> SelectionState {
        self.machine.state_of(id)
    }

    /// Whether clicking the street would be accepted
    pub fn is_selectable(&self, id: StreetEdgeId) -> Result<bool, Error> {
        let edge = self.graph.try_edge(id)?;
        Ok(self.machine.is_selectable(edge))
    }

    pub fn last_receipt(&self) -> Option<&SaveReceipt> {
        self.last_receipt.as_ref()
    }

    pub fn apply(&mut self, event: SelectionEvent) -> Transition {
        let transition = self.machine.apply(event, &self.graph);
        if transition.changes_route() {
            self.summary = recompute(self.machine.route(), &self.config);
        }
        transition
    }

    pub fn select(&mut self, id: StreetEdgeId) -> Transition {
        self.apply(SelectionEvent::Select(id))
    }

    /// Selects the street nearest to a clicked coordinate, if one is within
    /// the configured snap radius.
    pub fn select_at(&mut self, point: &Point<f64>) -> Option<Transition> {
        let id = self
            .graph
            .nearest_edge(point, self.config.snap_radius_m)?
            .id();
        Some(self.select(id))
    }

    pub fn reset(&mut self) -> Transition {
        self.apply(SelectionEvent::Reset)
    }

    /// Route length readout in the configured unit
    pub fn distance_text(&self) -> String {
        format_distance(self.summary.distance, self.summary.unit)
    }

    pub fn route_geojson(&self) -> Result<FeatureCollection, Error> {
        let chains =
            compute_contiguous_chains(self.route().edges(), self.config.proximity_tolerance_m);
        route_to_geojson(&chains)
    }

    pub fn markers_geojson(&self) -> Result<FeatureCollection, Error> {
        markers_to_geojson(&self.summary.markers)
    }

    /// Saves the route unless it is empty or identical to the last saved one.
    ///
    /// A failed save leaves the route and the no-op guard untouched.
    ///
    /// # Errors
    ///
    /// Propagates the store's error
    pub fn save<S>(&mut self, store: &mut S) -> Result<SaveOutcome, Error>
    where
        S: RouteStore + ?Sized,
    {
        let Some(region_id) = self.active_region() else {
            self.record(Activity::SaveEmpty);
            return Ok(SaveOutcome::SkippedEmpty);
        };

        let streets = self.summary.export.clone();
        if self.last_saved.as_ref() == Some(&streets) {
            self.record(Activity::SaveDuplicate);
            return Ok(SaveOutcome::SkippedDuplicate);
        }

        let request = SaveRequest { region_id, streets };
        match store.save(&request) {
            Ok(response) => {
                let receipt = SaveReceipt::new(response.route_id);
                info!(
                    "Saved route {} with {} streets",
                    receipt.route_id,
                    request.streets.len()
                );
                self.last_saved = Some(request.streets);
                self.last_receipt = Some(receipt.clone());
                self.record(Activity::SaveSuccess(receipt.route_id));
                Ok(SaveOutcome::Saved(receipt))
            }
            Err(e) => {
                error!("Saving route failed: {e}");
                self.record(Activity::SaveError);
                Err(e)
            }
        }
    }

    /// Drains the activity recorded since the last call.
    ///
    /// Hosts forwarding the activity log should call this after every save; only the
    /// newest `MAX_PENDING_ACTIVITIES` entries are kept in between.
    pub fn take_activities(&mut self) -> Vec<Activity> {
        std::mem::take(&mut self.activities)
    }

    fn record(&mut self, activity: Activity) {
        info!("{activity}");
        if self.activities.len() == MAX_PENDING_ACTIVITIES {
            self.activities.remove(0);
        }
        self.activities.push(activity);
    }
}
