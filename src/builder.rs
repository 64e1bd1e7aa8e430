use geo::Point;
use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pymethods};

use route_builder_core::prelude::*;

use crate::graph::PyStreetGraph;

/// RouteBuilder
///
/// Interactive route assembly over a StreetGraph. Each click on a street
/// cycles it through "not chosen" -> "chosen" -> "chosen reversed" ->
/// "not chosen". A route is locked to the neighborhood of its first street.
///
/// After every click the chosen streets are regrouped into contiguous
/// chains; distance, markers and the export list are always up to date.
///
/// Example:
///
/// .. code-block:: python
///
///     graph = load_street_graph(streets_json, regions_json)
///     builder = RouteBuilder(graph)
///     builder.click(1042)
///     builder.click(1043)
///     url = builder.save(lambda body: requests.post(SAVE_URL, data=body).json()["route_id"])
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "RouteBuilder")]
pub struct PyRouteBuilder {
    context: RouteBuilderContext,
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyRouteBuilder {
    /// Create a route builder
    ///
    /// Parameters
    /// ----------
    /// graph : StreetGraph
    ///     Streets to build the route from
    /// config_json : str, optional
    ///     JSON object with any of `proximity_tolerance_m`, `distance_unit`
    ///     ("meters", "kilometers", "miles", "feet"), `palette` and
    ///     `snap_radius_m`
    #[new]
    #[pyo3(signature = (graph, config_json=None))]
    pub fn new(graph: &PyStreetGraph, config_json: Option<&str>) -> PyResult<Self> {
        let context = match config_json {
            Some(json) => RouteBuilderConfig::from_json_str(json),
            None => Ok(RouteBuilderConfig::default()),
        }
        .and_then(|config| RouteBuilderContext::new(graph.graph.clone(), config))
        .map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Invalid route builder configuration: {e}"
            ))
        })?;

        Ok(PyRouteBuilder { context })
    }

    /// Handle a click on a street and return what happened
    ///
    /// One of "added", "added_reversed", "flipped", "removed",
    /// "rejected_other_region" or "rejected_unknown".
    pub fn click(&mut self, street_id: StreetEdgeId) -> &'static str {
        transition_name(self.context.select(street_id))
    }

    /// Handle a click on the map; None if no street is close enough
    pub fn click_at(&mut self, lat: f64, lon: f64) -> Option<&'static str> {
        self.context
            .select_at(&Point::new(lon, lat))
            .map(transition_name)
    }

    /// Remove every street from the route
    pub fn clear(&mut self) {
        self.context.reset();
    }

    pub fn state_of(&self, street_id: StreetEdgeId) -> &'static str {
        self.context.state_of(street_id).as_str()
    }

    /// Neighborhood the route is locked to
    #[getter]
    pub fn active_region(&self) -> Option<RegionId> {
        self.context.active_region()
    }

    pub fn is_selectable(&self, street_id: StreetEdgeId) -> PyResult<bool> {
        self.context
            .is_selectable(street_id)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyKeyError, _>(e.to_string()))
    }

    /// Chosen street ids in the order they were added
    pub fn street_ids(&self) -> Vec<StreetEdgeId> {
        self.context.route().street_ids()
    }

    /// Street ids per contiguous chain
    pub fn chains(&self) -> Vec<Vec<StreetEdgeId>> {
        self.context.summary().chains.clone()
    }

    /// Total length in the configured unit
    pub fn distance(&self) -> f64 {
        self.context.summary().distance
    }

    pub fn distance_text(&self) -> String {
        self.context.distance_text()
    }

    /// Streets in walking order as (street_id, reverse)
    pub fn export_list(&self) -> Vec<(StreetEdgeId, bool)> {
        self.context
            .summary()
            .export
            .iter()
            .map(|street| (street.street_id, street.reverse))
            .collect()
    }

    pub fn route_geojson(&self) -> PyResult<String> {
        let collection = self.context.route_geojson().map_err(to_runtime_error)?;
        serde_json::to_string(&collection).map_err(|e| to_runtime_error(e.into()))
    }

    pub fn markers_geojson(&self) -> PyResult<String> {
        let collection = self.context.markers_geojson().map_err(to_runtime_error)?;
        serde_json::to_string(&collection).map_err(|e| to_runtime_error(e.into()))
    }

    /// Save the route through `callback`
    ///
    /// The callback receives the JSON request body
    /// `{"region_id": ..., "streets": [{"street_id": ..., "reverse": ...}]}`
    /// and must return the new route id, either as an int or as the JSON
    /// response text `{"route_id": ...}`.
    ///
    /// Returns the viewer URL, or None when the route is empty or unchanged
    /// since the last successful save, in which case the callback is not
    /// called. Exceptions raised by the callback propagate unchanged and leave
    /// the route as it was.
    pub fn save(&mut self, callback: &Bound<'_, PyAny>) -> PyResult<Option<String>> {
        let mut store = PyCallbackStore {
            callback,
            failure: None,
        };

        match self.context.save(&mut store) {
            Ok(SaveOutcome::Saved(receipt)) => Ok(Some(receipt.explore_url)),
            Ok(SaveOutcome::SkippedEmpty | SaveOutcome::SkippedDuplicate) => Ok(None),
            Err(e) => Err(store.failure.take().unwrap_or_else(|| to_runtime_error(e))),
        }
    }

    /// Shareable link of the last saved route
    pub fn share_link(&self, origin: &str) -> Option<String> {
        self.context
            .last_receipt()
            .map(|receipt| receipt.share_link(origin))
    }

    /// Activity log entries recorded since the last call
    pub fn take_activities(&mut self) -> Vec<String> {
        self.context
            .take_activities()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn __len__(&self) -> usize {
        self.context.route().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "RouteBuilder with {} streets in {} chains, {}",
            self.context.route().len(),
            self.context.summary().chain_count(),
            self.context.distance_text()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// Route store backed by a Python callable
struct PyCallbackStore<'a, 'py> {
    callback: &'a Bound<'py, PyAny>,
    failure: Option<PyErr>,
}

impl RouteStore for PyCallbackStore<'_, '_> {
    fn save(&mut self, request: &SaveRequest) -> Result<SaveResponse, Error> {
        let body = request.to_json()?;
        let returned = self.callback.call1((body,)).and_then(|value| {
            if let Ok(route_id) = value.extract::<RouteId>() {
                return Ok(route_id);
            }
            let text = value.extract::<String>()?;
            SaveResponse::from_json_str(&text)
                .map(|response| response.route_id)
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
        });

        match returned {
            Ok(route_id) => Ok(SaveResponse { route_id }),
            Err(e) => {
                let message = e.to_string();
                self.failure = Some(e);
                Err(Error::Persistence(message))
            }
        }
    }
}

fn transition_name(transition: Transition) -> &'static str {
    match transition {
        Transition::Added {
            reversed: false, ..
        } => "added",
        Transition::Added { reversed: true, .. } => "added_reversed",
        Transition::Flipped { .. } => "flipped",
        Transition::Removed { .. } => "removed",
        Transition::Cleared => "cleared",
        Transition::Rejected {
            reason: RejectReason::OtherRegion { .. },
            ..
        } => "rejected_other_region",
        Transition::Rejected {
            reason: RejectReason::UnknownStreet,
            ..
        } => "rejected_unknown",
    }
}

fn to_runtime_error(e: Error) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("Route builder error: {e}"))
}
