//! This module is responsible for loading GTFS data and building
//! the schedule index and daily timetable from it.

mod builder;
mod config;
pub mod gtfs;

pub use builder::{create_schedule_index, create_timetable};
pub use config::TimetableConfig;
