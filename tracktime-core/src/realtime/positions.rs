use geo::Point;
use itertools::Itertools;

use crate::model::shape::ShapeGeometry;
use crate::{ActiveTrip, Distance, ScheduleIndex, Time};

/// Estimated position of one vehicle at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct TrainPosition {
    pub trip_id: String,
    pub route_id: String,
    /// `x` is longitude, `y` is latitude
    pub geometry: Point<f64>,
    /// Interpolated distance along the trip's shape
    pub distance: Distance,
    /// Fraction of the current stop-to-stop segment already travelled
    pub progress: f64,
}

/// Positions of every vehicle running at `time`.
///
/// Trips that are not between two of their stops, have no known shape or
/// fall outside their shape produce no position. Output follows `trips` order.
pub fn positions_at(index: &ScheduleIndex, trips: &[ActiveTrip], time: Time) -> Vec<TrainPosition> {
    trips
        .iter()
        .filter(|trip| trip.is_running_at(time))
        .filter_map(|trip| {
            let shape = index.shape(trip.shape_id())?;
            position_of(trip, shape, time)
        })
        .collect()
}

/// Position of a single trip on `shape` at `time`.
///
/// The segment is the first pair of consecutive stops with
/// `prev.arrival <= time < next.arrival`; the vehicle is placed at the
/// time-proportional distance between the two stops' shape distances.
pub fn position_of(trip: &ActiveTrip, shape: &ShapeGeometry, time: Time) -> Option<TrainPosition> {
    let (prev, next) = trip
        .stop_times()
        .iter()
        .tuple_windows()
        .find(|(prev, next)| prev.arrival <= time && time < next.arrival)?;

    let duration = next.arrival - prev.arrival;
    let progress = if duration == 0 {
        0.0
    } else {
        f64::from(time - prev.arrival) / f64::from(duration)
    };
    let distance = prev.shape_dist + (next.shape_dist - prev.shape_dist) * progress;

    let geometry = shape.position_at_distance(distance)?;
    Some(TrainPosition {
        trip_id: trip.trip_id().to_string(),
        route_id: trip.route_id().to_string(),
        geometry,
        distance,
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shape::tests::point;
    use crate::scheduling::active_trips;
    use crate::scheduling::tests::{index_with, stop_time, trip};
    use approx::assert_relative_eq;
    use hashbrown::HashSet;

    fn shape(shape_id: &str) -> ShapeGeometry {
        ShapeGeometry::new(
            shape_id,
            vec![
                point(0.0, 0.0, 1, 0.0),
                point(1.0, 0.0, 2, 100.0),
                point(3.0, 0.0, 3, 300.0),
            ],
        )
        .unwrap()
    }

    fn network() -> (ScheduleIndex, Vec<ActiveTrip>) {
        let index = index_with(
            vec![
                (
                    trip("T1", "R1", "SH", "WK"),
                    vec![stop_time("A", 0, 1, 0.0), stop_time("C", 300, 2, 300.0)],
                ),
                (
                    trip("T2", "R1", "SH", "WK"),
                    vec![
                        stop_time("A", 1000, 1, 0.0),
                        stop_time("B", 1100, 2, 100.0),
                        stop_time("B", 1160, 3, 100.0),
                        stop_time("C", 1360, 4, 300.0),
                    ],
                ),
                (
                    trip("T3", "R2", "UNKNOWN_SHAPE", "WK"),
                    vec![stop_time("A", 0, 1, 0.0), stop_time("C", 300, 2, 300.0)],
                ),
                (
                    trip("T4", "R2", "SH", "WK"),
                    vec![stop_time("A", 0, 1, 0.0), stop_time("Z", 300, 2, 900.0)],
                ),
            ],
            vec![shape("SH")],
            vec![],
        );
        let services: HashSet<String> = HashSet::from(["WK".to_string()]);
        let trips = active_trips(&index, &services);
        (index, trips)
    }

    #[test]
    fn halfway_in_time_lands_in_later_shape_segment() {
        let (index, trips) = network();
        let positions = positions_at(&index, &trips[..1], 150);

        assert_eq!(positions.len(), 1);
        let pos = &positions[0];
        assert_eq!(pos.trip_id, "T1");
        assert_eq!(pos.route_id, "R1");
        assert_relative_eq!(pos.progress, 0.5);
        assert_relative_eq!(pos.distance, 150.0);
        // fraction 0.25 between (1, 0) and (3, 0)
        assert_relative_eq!(pos.geometry.x(), 1.5);
        assert_relative_eq!(pos.geometry.y(), 0.0);
    }

    #[test]
    fn at_stop_time_vehicle_is_at_the_stop() {
        let (index, trips) = network();
        let t2 = trips.iter().find(|t| t.trip_id() == "T2").unwrap();
        let shape = index.shape("SH").unwrap();

        let pos = position_of(t2, shape, 1100).unwrap();
        assert_relative_eq!(pos.progress, 0.0);
        assert_relative_eq!(pos.geometry.x(), 1.0);

        // dwelling at B
        let dwell = position_of(t2, shape, 1130).unwrap();
        assert_relative_eq!(dwell.geometry.x(), 1.0);
    }

    #[test]
    fn vehicles_outside_service_window_are_absent() {
        let (index, trips) = network();
        let ids = |time| {
            positions_at(&index, &trips, time)
                .into_iter()
                .map(|p| p.trip_id)
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(50), vec!["T1", "T4"]);
        assert_eq!(ids(150), vec!["T1"]);
        assert_eq!(ids(999), Vec::<String>::new());
        assert_eq!(ids(1050), vec!["T2"]);
        // exactly at the last stop there is no segment left
        assert_eq!(ids(1360), Vec::<String>::new());
    }

    #[test]
    fn unknown_shape_and_overrun_are_silently_skipped() {
        let (index, trips) = network();
        let t4 = trips.iter().find(|t| t.trip_id() == "T4").unwrap();

        // T4's stop distances run past the end of its shape
        assert!(position_of(t4, index.shape("SH").unwrap(), 50).is_some());
        assert!(position_of(t4, index.shape("SH").unwrap(), 200).is_none());
        assert!(positions_at(&index, &trips, 200).iter().all(|p| p.trip_id != "T3"));
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let (index, trips) = network();
        for time in [0, 75, 150, 299, 1000, 1111, 1359] {
            assert_eq!(
                positions_at(&index, &trips, time),
                positions_at(&index, &trips, time)
            );
        }
    }

    #[test]
    fn distance_never_decreases_within_trip() {
        let (index, trips) = network();
        let t2 = trips.iter().find(|t| t.trip_id() == "T2").unwrap();
        let shape = index.shape("SH").unwrap();

        let distances: Vec<f64> = (1000..1360)
            .filter_map(|time| position_of(t2, shape, time))
            .map(|p| p.distance)
            .collect();
        assert_eq!(distances.len(), 360);
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }
}
