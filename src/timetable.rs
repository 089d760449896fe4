use std::path::PathBuf;

use pyo3::prelude::*;
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};
use tracktime_core::prelude::*;

use crate::departures::PyDeparture;
use crate::positions::PyVehiclePosition;

fn to_py_err(context: &str, error: Error) -> PyErr {
    match error {
        Error::InvalidData(_) | Error::MissingColumns { .. } | Error::MalformedFeed(_) => {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{context}: {error}"))
        }
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("{context}: {error}")),
    }
}

/// Timetable
///
/// The schedule of one or more GTFS feeds resolved for a single service
/// date. Holds the trips running that day and answers "where is every
/// vehicle now" and "what leaves this stop next".
///
/// Times are seconds since midnight of the service date and may exceed
/// 86400 for trips running past midnight.
///
/// Example:
///
/// .. code-block:: python
///
///     timetable = create_timetable(["path/to/gtfs"], datetime.date(2024, 5, 7))
///     positions = timetable.get_vehicle_positions(8 * 3600)
///     board = timetable.get_upcoming_departures("SOL", 8 * 3600, limit=5)
#[gen_stub_pyclass]
#[pyclass(name = "Timetable")]
pub struct PyTimetable {
    pub(crate) timetable: Timetable,
}

#[gen_stub_pymethods]
#[pymethods]
impl PyTimetable {
    /// Positions of every trip running at `now_seconds` that has a usable shape
    pub fn get_vehicle_positions(&self, now_seconds: u32) -> Vec<PyVehiclePosition> {
        self.timetable
            .vehicle_positions(now_seconds)
            .into_iter()
            .map(PyVehiclePosition::from)
            .collect()
    }

    /// Departures from `stop_id` strictly after `now_seconds`, soonest first
    #[pyo3(signature = (stop_id, now_seconds, limit = 10))]
    pub fn get_upcoming_departures(
        &self,
        stop_id: &str,
        now_seconds: u32,
        limit: usize,
    ) -> Vec<PyDeparture> {
        self.timetable
            .upcoming_departures(stop_id, now_seconds, limit)
            .into_iter()
            .map(PyDeparture::from)
            .collect()
    }

    /// Vehicle positions at `now_seconds` as a GeoJSON FeatureCollection string
    pub fn vehicle_positions_geojson(&self, now_seconds: u32) -> PyResult<String> {
        let positions = self.timetable.vehicle_positions(now_seconds);
        positions_to_geojson(&positions)
            .and_then(|collection| to_geojson_string(&collection))
            .map_err(|e| to_py_err("Failed to export vehicle positions", e))
    }

    /// Stops as a GeoJSON FeatureCollection string
    pub fn stops_geojson(&self) -> PyResult<String> {
        stops_to_geojson(self.timetable.index())
            .and_then(|collection| to_geojson_string(&collection))
            .map_err(|e| to_py_err("Failed to export stops", e))
    }

    /// Shapes as a GeoJSON FeatureCollection string
    pub fn shapes_geojson(&self) -> PyResult<String> {
        shapes_to_geojson(self.timetable.index())
            .and_then(|collection| to_geojson_string(&collection))
            .map_err(|e| to_py_err("Failed to export shapes", e))
    }

    /// Switch to another service date.
    ///
    /// Returns ``True`` when the date changed and the active trips were
    /// recomputed, ``False`` when it is already the current date.
    pub fn refresh(&mut self, date: chrono::NaiveDate) -> bool {
        self.timetable.refresh(date)
    }

    #[getter]
    pub fn service_date(&self) -> chrono::NaiveDate {
        self.timetable.service_date()
    }

    /// Bounding box of all shapes (or stops) as ``(min_x, min_y, max_x, max_y)``
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.timetable
            .index()
            .bounds()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    pub fn stop_count(&self) -> usize {
        self.timetable.index().stop_count()
    }

    pub fn route_count(&self) -> usize {
        self.timetable.index().route_count()
    }

    pub fn trip_count(&self) -> usize {
        self.timetable.index().trip_count()
    }

    pub fn active_trip_count(&self) -> usize {
        self.timetable.active_trips().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Timetable for {} with {} stops, {} routes and {} of {} trips active",
            self.timetable.service_date(),
            self.stop_count(),
            self.route_count(),
            self.active_trip_count(),
            self.trip_count()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// Load GTFS feeds and resolve their schedule for one service date
///
/// Parameters
/// ----------
/// gtfs_dirs : list[str]
///     Paths to directories containing GTFS ``.txt`` files. Feeds are merged.
/// date : datetime.date, optional
///     Service date to resolve. If None, today's local date is used.
///
/// Returns
/// -------
/// Timetable
///     The loaded schedule with the trips running on `date`
///
/// Raises
/// ------
/// ValueError
///     If a feed is missing required columns or contains invalid rows
/// RuntimeError
///     If a feed cannot be read
#[gen_stub_pyfunction]
#[pyfunction(name = "create_timetable")]
#[pyo3(signature = (gtfs_dirs, date = None))]
pub fn py_create_timetable(
    gtfs_dirs: Vec<String>,
    date: Option<chrono::NaiveDate>,
) -> PyResult<PyTimetable> {
    let config = TimetableConfig {
        gtfs_dirs: gtfs_dirs.into_iter().map(PathBuf::from).collect(),
        date,
    };

    let timetable = tracktime_core::create_timetable(&config)
        .map_err(|e| to_py_err("Failed to create timetable", e))?;

    Ok(PyTimetable { timetable })
}
