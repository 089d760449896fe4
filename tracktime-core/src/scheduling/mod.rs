//! Trips running on one service day

use std::sync::Arc;

use hashbrown::HashSet;

use crate::model::types::{StopTimeEntry, Trip};
use crate::{ScheduleIndex, Time};

/// A trip of the current service day together with its ordered stop times.
///
/// Both halves are shared with the [`ScheduleIndex`] it was selected from.
#[derive(Debug, Clone)]
pub struct ActiveTrip {
    trip: Arc<Trip>,
    stop_times: Arc<[StopTimeEntry]>,
}

impl ActiveTrip {
    /// Returns `None` for a trip without stop times
    pub fn new(trip: Arc<Trip>, stop_times: Arc<[StopTimeEntry]>) -> Option<Self> {
        if stop_times.is_empty() {
            None
        } else {
            Some(Self { trip, stop_times })
        }
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn trip_id(&self) -> &str {
        &self.trip.trip_id
    }

    pub fn route_id(&self) -> &str {
        &self.trip.route_id
    }

    pub fn shape_id(&self) -> &str {
        &self.trip.shape_id
    }

    pub fn headsign(&self) -> &str {
        &self.trip.headsign
    }

    /// Ordered by stop sequence, never empty
    pub fn stop_times(&self) -> &[StopTimeEntry] {
        &self.stop_times
    }

    pub fn first_departure(&self) -> Time {
        self.stop_times[0].arrival
    }

    pub fn last_arrival(&self) -> Time {
        self.stop_times[self.stop_times.len() - 1].arrival
    }

    /// Whether the vehicle is on the road at `time`, ends included
    pub fn is_running_at(&self, time: Time) -> bool {
        (self.first_departure()..=self.last_arrival()).contains(&time)
    }
}

/// Select every trip whose service is in `active_services`.
///
/// Trips without stop times are skipped. The result is ordered by trip id.
pub fn active_trips(index: &ScheduleIndex, active_services: &HashSet<String>) -> Vec<ActiveTrip> {
    let mut trips: Vec<ActiveTrip> = index
        .trips()
        .filter(|trip| active_services.contains(trip.service_id.as_str()))
        .filter_map(|trip| {
            let stop_times = index.stop_times(&trip.trip_id)?;
            ActiveTrip::new(Arc::clone(trip), Arc::clone(stop_times))
        })
        .collect();

    trips.sort_unstable_by(|a, b| a.trip_id().cmp(b.trip_id()));
    trips
}
