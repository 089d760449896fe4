//! One service day of a schedule: the active trips and the queries over them

use chrono::NaiveDate;
use hashbrown::HashSet;
use log::debug;

use crate::realtime::{Departure, TrainPosition, positions_at, upcoming_departures};
use crate::scheduling::{ActiveTrip, active_trips};
use crate::{ScheduleIndex, Time};

/// Schedule index plus the trips running on the current service date.
///
/// The active trip list is derived once per date; [`Timetable::refresh`]
/// must be called when the local date changes.
#[derive(Debug, Clone)]
pub struct Timetable {
    index: ScheduleIndex,
    service_date: NaiveDate,
    active_services: HashSet<String>,
    active_trips: Vec<ActiveTrip>,
}

impl Timetable {
    pub fn new(index: ScheduleIndex, service_date: NaiveDate) -> Self {
        let active_services = index.calendar().active_services(service_date);
        let active_trips = active_trips(&index, &active_services);

        Self {
            index,
            service_date,
            active_services,
            active_trips,
        }
    }

    /// Switch to `date`, rebuilding the active trips only if the date changed.
    ///
    /// Returns whether a rebuild happened.
    pub fn refresh(&mut self, date: NaiveDate) -> bool {
        if date == self.service_date {
            return false;
        }

        self.active_services = self.index.calendar().active_services(date);
        self.active_trips = active_trips(&self.index, &self.active_services);
        self.service_date = date;
        debug!(
            "Switched timetable to {date}: {} active trips",
            self.active_trips.len()
        );
        true
    }

    /// Positions of all vehicles running at `now` seconds after midnight
    pub fn vehicle_positions(&self, now: Time) -> Vec<TrainPosition> {
        positions_at(&self.index, &self.active_trips, now)
    }

    pub fn upcoming_departures(&self, stop_id: &str, now: Time, limit: usize) -> Vec<Departure> {
        upcoming_departures(&self.index, &self.active_trips, stop_id, now, limit)
    }

    pub fn index(&self) -> &ScheduleIndex {
        &self.index
    }

    pub fn service_date(&self) -> NaiveDate {
        self.service_date
    }

    pub fn active_services(&self) -> &HashSet<String> {
        &self.active_services
    }

    pub fn active_trips(&self) -> &[ActiveTrip] {
        &self.active_trips
    }
}
