// Re-export key components
pub use crate::export::{positions_to_geojson, shapes_to_geojson, stops_to_geojson, to_geojson_string};
pub use crate::loading::{TimetableConfig, create_schedule_index, create_timetable};
pub use crate::model::{
    NEUTRAL_ROUTE_COLOR, Route, ScheduleIndex, ServiceCalendar, ShapeGeometry, Stop,
    StopTimeEntry, Timetable, Trip, UNKNOWN_ROUTE_SHORT_NAME,
};
pub use crate::realtime::{Departure, TrainPosition, format_time, positions_at, upcoming_departures};
pub use crate::scheduling::{ActiveTrip, active_trips};

pub use crate::Error;
pub use crate::{Distance, Time};
