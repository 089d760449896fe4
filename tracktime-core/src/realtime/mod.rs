//! Per-tick vehicle positions and per-query departure boards

mod departures;
mod positions;

pub use departures::{Departure, format_time, upcoming_departures};
pub use positions::{TrainPosition, position_of, positions_at};
