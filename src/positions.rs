use pyo3::prelude::*;
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pymethods};

use tracktime_core::prelude::*;

/// Interpolated position of a running trip
///
/// ``x`` is the longitude and ``y`` the latitude of the vehicle.
/// ``distance`` is measured in meters along the trip's shape.
#[gen_stub_pyclass]
#[pyclass(name = "VehiclePosition", frozen)]
#[derive(Clone)]
pub struct PyVehiclePosition {
    #[pyo3(get)]
    pub trip_id: String,
    #[pyo3(get)]
    pub route_id: String,
    #[pyo3(get)]
    pub x: f64,
    #[pyo3(get)]
    pub y: f64,
    #[pyo3(get)]
    pub distance: f64,
    #[pyo3(get)]
    pub progress: f64,
}

impl From<TrainPosition> for PyVehiclePosition {
    fn from(position: TrainPosition) -> Self {
        Self {
            x: position.geometry.x(),
            y: position.geometry.y(),
            distance: position.distance,
            progress: position.progress,
            trip_id: position.trip_id,
            route_id: position.route_id,
        }
    }
}

#[gen_stub_pymethods]
#[pymethods]
impl PyVehiclePosition {
    fn __repr__(&self) -> String {
        format!(
            "VehiclePosition(trip_id='{}', route_id='{}', x={}, y={})",
            self.trip_id, self.route_id, self.x, self.y
        )
    }
}
