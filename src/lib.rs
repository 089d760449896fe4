use pyo3::prelude::*;
use pyo3_stub_gen::define_stub_info_gatherer;

use departures::PyDeparture;
use positions::PyVehiclePosition;
use timetable::{PyTimetable, py_create_timetable};

pub mod departures;
pub mod positions;
pub mod timetable;

/// A Python module implemented in Rust.
#[pymodule]
fn tracktime(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyTimetable>()?;
    m.add_function(wrap_pyfunction!(py_create_timetable, m)?)?;

    m.add_class::<PyVehiclePosition>()?;
    m.add_class::<PyDeparture>()?;
    Ok(())
}

define_stub_info_gatherer!(stub_info);
