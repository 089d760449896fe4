use pyo3::prelude::*;
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pymethods};

use tracktime_core::prelude::*;

/// Upcoming departure from a stop
#[gen_stub_pyclass]
#[pyclass(name = "Departure", frozen)]
#[derive(Clone)]
pub struct PyDeparture {
    /// Seconds since midnight of the service date, may exceed 86400
    #[pyo3(get)]
    pub time_seconds: u32,
    #[pyo3(get)]
    pub headsign: String,
    #[pyo3(get)]
    pub route_short_name: String,
    /// Hex color without leading '#'
    #[pyo3(get)]
    pub route_color: String,
    #[pyo3(get)]
    pub trip_id: String,
    #[pyo3(get)]
    pub route_id: String,
}

impl From<Departure> for PyDeparture {
    fn from(departure: Departure) -> Self {
        Self {
            time_seconds: departure.time,
            headsign: departure.headsign,
            route_short_name: departure.route_short_name,
            route_color: departure.route_color,
            trip_id: departure.trip_id,
            route_id: departure.route_id,
        }
    }
}

#[gen_stub_pymethods]
#[pymethods]
impl PyDeparture {
    /// Departure time as ``HH:MM``, wrapped past midnight
    #[getter]
    fn display_time(&self) -> String {
        format_time(self.time_seconds)
    }

    fn __repr__(&self) -> String {
        format!(
            "Departure({} {} to '{}')",
            self.display_time(),
            self.route_short_name,
            self.headsign
        )
    }
}
