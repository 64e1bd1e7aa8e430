use std::sync::Arc;

use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};

use route_builder_core::prelude::*;

/// StreetGraph
///
/// The immutable set of selectable street edges and the neighborhoods they
/// belong to. One graph can back any number of RouteBuilder instances.
///
/// Streets that failed validation at load time are not part of the graph and
/// can never be selected; `rejected_features` lists them.
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "StreetGraph")]
pub struct PyStreetGraph {
    pub(crate) graph: Arc<StreetGraph>,
    report: LoadReport,
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyStreetGraph {
    pub fn street_count(&self) -> usize {
        self.graph.len()
    }

    pub fn region_ids(&self) -> Vec<RegionId> {
        self.graph.regions().iter().map(|region| region.id).collect()
    }

    pub fn region_name(&self, region_id: RegionId) -> Option<String> {
        self.graph
            .region(region_id)
            .and_then(|region| region.name.clone())
    }

    /// Ids of the streets that belong to a neighborhood
    pub fn streets_in_region(&self, region_id: RegionId) -> Vec<StreetEdgeId> {
        self.graph
            .streets_in_region(region_id)
            .map(StreetEdge::id)
            .collect()
    }

    /// Features left out of the graph as (kind, index, reason)
    pub fn rejected_features(&self) -> Vec<(String, usize, String)> {
        self.report
            .rejected
            .iter()
            .map(|rejected| {
                (
                    rejected.kind.to_string(),
                    rejected.index,
                    rejected.reason.clone(),
                )
            })
            .collect()
    }

    fn __len__(&self) -> usize {
        self.graph.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "StreetGraph with {} streets and {} regions ({} features rejected)",
            self.graph.len(),
            self.graph.regions().len(),
            self.report.rejected.len()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// Load the street graph from GeoJSON
///
/// Parameters
/// ----------
/// streets_geojson : str
///     FeatureCollection of LineString features with integer
///     `street_edge_id` and `region_id` properties
/// regions_geojson : str, optional
///     FeatureCollection of Polygon or MultiPolygon features with an integer
///     `region_id` and an optional `region_name` property
///
/// Returns
/// -------
/// StreetGraph
///     The graph of all valid streets
///
/// Raises
/// ------
/// ValueError
///     If a collection is not valid JSON or has no `features` array.
///     Individual malformed features do not raise; they are skipped.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "load_street_graph")]
#[pyo3(signature = (streets_geojson, regions_geojson=None))]
pub fn py_load_street_graph(
    streets_geojson: &str,
    regions_geojson: Option<&str>,
) -> PyResult<PyStreetGraph> {
    let (graph, report) = load_street_graph(streets_geojson, regions_geojson).map_err(|e| {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Failed to load street graph: {e}"
        ))
    })?;

    Ok(PyStreetGraph {
        graph: Arc::new(graph),
        report,
    })
}
