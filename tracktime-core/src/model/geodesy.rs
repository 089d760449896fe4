use geo::{Distance, HaversineMeasure, Point};

/// Earth radius used for great-circle distances, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two lon/lat points
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_M).distance(a, b)
}
