//! Immutable, id-keyed index over one loaded schedule

use std::sync::Arc;

use geo::{BoundingRect, MultiPoint, Rect};
use hashbrown::HashMap;

use super::calendar::ServiceCalendar;
use super::shape::ShapeGeometry;
use super::types::{Route, Stop, StopTimeEntry, Trip};
use crate::Error;
use crate::loading::gtfs::{FeedTables, schedule_index_from_feed};

/// Stops, routes, trips, stop times, shapes and the service calendar of a feed.
///
/// Built once per loaded dataset; all lookups return `None` for unknown ids.
/// Trips, stop-time sequences and shapes are reference counted so the
/// per-day active trip list shares them instead of copying.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    pub(crate) stops: HashMap<String, Stop>,
    pub(crate) routes: HashMap<String, Route>,
    pub(crate) trips: HashMap<String, Arc<Trip>>,
    /// Per trip, ordered by stop sequence with non-decreasing arrival
    pub(crate) stop_times: HashMap<String, Arc<[StopTimeEntry]>>,
    pub(crate) shapes: HashMap<String, Arc<ShapeGeometry>>,
    pub(crate) calendar: ServiceCalendar,
}

impl ScheduleIndex {
    /// Build the index from raw feed tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedFeed`] listing every row that could not be
    /// parsed; nothing is indexed in that case.
    pub fn build(tables: FeedTables) -> Result<Self, Error> {
        schedule_index_from_feed(tables)
    }

    pub fn stop(&self, stop_id: &str) -> Option<&Stop> {
        self.stops.get(stop_id)
    }

    pub fn route(&self, route_id: &str) -> Option<&Route> {
        self.routes.get(route_id)
    }

    pub fn trip(&self, trip_id: &str) -> Option<&Arc<Trip>> {
        self.trips.get(trip_id)
    }

    pub fn stop_times(&self, trip_id: &str) -> Option<&Arc<[StopTimeEntry]>> {
        self.stop_times.get(trip_id)
    }

    pub fn shape(&self, shape_id: &str) -> Option<&Arc<ShapeGeometry>> {
        self.shapes.get(shape_id)
    }

    pub fn calendar(&self) -> &ServiceCalendar {
        &self.calendar
    }

    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.values()
    }

    pub fn trips(&self) -> impl Iterator<Item = &Arc<Trip>> {
        self.trips.values()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Arc<ShapeGeometry>> {
        self.shapes.values()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Bounding rectangle of all shape points, or of the stops when the feed
    /// has no shapes. `None` for an empty feed.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let shape_points: MultiPoint<f64> = self
            .shapes
            .values()
            .flat_map(|shape| shape.points().iter().map(|p| p.geometry))
            .collect();
        if !shape_points.0.is_empty() {
            return shape_points.bounding_rect();
        }

        let stop_points: MultiPoint<f64> = self
            .stops
            .values()
            .map(|stop| stop.geometry)
            .collect();
        stop_points.bounding_rect()
    }
}
