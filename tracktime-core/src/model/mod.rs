//! Data model of an indexed schedule and its daily view

pub mod calendar;
pub mod geodesy;
pub mod schedule;
pub mod shape;
pub mod timetable;
pub mod types;

pub use calendar::{CalendarEntry, CalendarException, ExceptionKind, ServiceCalendar, WeekdayFlags};
pub use schedule::ScheduleIndex;
pub use shape::{ShapeGeometry, ShapePoint};
pub use timetable::Timetable;
pub use types::{NEUTRAL_ROUTE_COLOR, Route, Stop, StopTimeEntry, Trip, UNKNOWN_ROUTE_SHORT_NAME};
