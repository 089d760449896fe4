//! Typed schedule records, immutable once the index is built

use geo::Point;

use crate::{Distance, Time};

/// Short name shown for departures whose route is not in the feed
pub const UNKNOWN_ROUTE_SHORT_NAME: &str = "N/A";
/// Hex color (without `#`) used when a route has no usable color
pub const NEUTRAL_ROUTE_COLOR: &str = "808080";

#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub stop_id: String,
    pub name: String,
    /// `x` is longitude, `y` is latitude
    pub geometry: Point<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route_id: String,
    pub short_name: String,
    /// Hex color without `#`, may be empty
    pub color: String,
}

impl Route {
    /// Route color, or [`NEUTRAL_ROUTE_COLOR`] when the feed leaves it empty
    pub fn display_color(&self) -> &str {
        if self.color.is_empty() {
            NEUTRAL_ROUTE_COLOR
        } else {
            &self.color
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub trip_id: String,
    pub route_id: String,
    pub shape_id: String,
    pub headsign: String,
    pub service_id: String,
}

/// One scheduled call of a trip at a stop
#[derive(Debug, Clone, PartialEq)]
pub struct StopTimeEntry {
    pub stop_id: String,
    pub arrival: Time,
    pub stop_sequence: u32,
    /// Distance along the trip's shape, 0 when unknown
    pub shape_dist: Distance,
}
