use pyo3::prelude::*;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::define_stub_info_gatherer;

use builder::PyRouteBuilder;
use graph::{PyStreetGraph, py_load_street_graph};

pub mod builder;
pub mod graph;

/// A Python module implemented in Rust.
#[pymodule]
fn route_builder(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyStreetGraph>()?;
    m.add_function(wrap_pyfunction!(py_load_street_graph, m)?)?;

    m.add_class::<PyRouteBuilder>()?;
    Ok(())
}

#[cfg(feature = "stubgen")]
define_stub_info_gatherer!(stub_info);
