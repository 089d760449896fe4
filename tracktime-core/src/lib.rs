//! Static-schedule engine behind a live transit map.
//!
//! A GTFS feed is indexed once ([`ScheduleIndex`]), the services running on a
//! calendar day are resolved ([`ServiceCalendar`]) and the matching trips are
//! attached to their stop sequences ([`ActiveTrip`]). For any time of day the
//! engine then estimates where every vehicle is along its shape and which
//! departures are coming up at a stop.

pub mod error;
pub mod export;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod realtime;
pub mod scheduling;

pub use error::{Error, RowError};
pub use loading::{TimetableConfig, create_schedule_index, create_timetable};
pub use model::{
    ScheduleIndex, ServiceCalendar, ShapeGeometry, Timetable,
    types::{Route, Stop, StopTimeEntry, Trip},
};
pub use realtime::{Departure, TrainPosition, positions_at, upcoming_departures};
pub use scheduling::{ActiveTrip, active_trips};

/// Seconds since local midnight of the service day.
///
/// Trips running past midnight keep counting, so values above 86 400 are valid.
pub type Time = u32;

/// Cumulative distance along a shape, in the feed's `shape_dist_traveled`
/// units or meters when recomputed.
pub type Distance = f64;
