use crate::model::types::{NEUTRAL_ROUTE_COLOR, UNKNOWN_ROUTE_SHORT_NAME};
use crate::{ActiveTrip, ScheduleIndex, Time};

/// A scheduled call at a stop, as shown on a departure board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub time: Time,
    pub headsign: String,
    pub route_short_name: String,
    /// Hex color without `#`
    pub route_color: String,
    pub trip_id: String,
    pub route_id: String,
}

impl Departure {
    pub fn display_time(&self) -> String {
        format_time(self.time)
    }
}

/// Departures from `stop_id` strictly after `time`, soonest first, at most `limit`.
///
/// A trip visiting the stop twice contributes one departure per visit.
/// Routes missing from the index show as [`UNKNOWN_ROUTE_SHORT_NAME`] in
/// [`NEUTRAL_ROUTE_COLOR`].
pub fn upcoming_departures(
    index: &ScheduleIndex,
    trips: &[ActiveTrip],
    stop_id: &str,
    time: Time,
    limit: usize,
) -> Vec<Departure> {
    let mut departures: Vec<Departure> = trips
        .iter()
        .flat_map(|trip| {
            trip.stop_times()
                .iter()
                .filter(move |st| st.stop_id == stop_id && st.arrival > time)
                .map(move |st| departure(index, trip, st.arrival))
        })
        .collect();

    departures.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.trip_id.cmp(&b.trip_id)));
    departures.truncate(limit);
    departures
}

fn departure(index: &ScheduleIndex, trip: &ActiveTrip, time: Time) -> Departure {
    let (route_short_name, route_color) = match index.route(trip.route_id()) {
        Some(route) => (route.short_name.clone(), route.display_color().to_string()),
        None => (
            UNKNOWN_ROUTE_SHORT_NAME.to_string(),
            NEUTRAL_ROUTE_COLOR.to_string(),
        ),
    };

    Departure {
        time,
        headsign: trip.headsign().to_string(),
        route_short_name,
        route_color,
        trip_id: trip.trip_id().to_string(),
        route_id: trip.route_id().to_string(),
    }
}

/// `HH:MM` clock time; times past midnight wrap around
pub fn format_time(time: Time) -> String {
    let minutes = (time / 60) % (24 * 60);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Route;
    use crate::scheduling::active_trips;
    use crate::scheduling::tests::{index_with, stop_time, trip};
    use hashbrown::HashSet;

    fn board() -> (ScheduleIndex, Vec<ActiveTrip>) {
        let index = index_with(
            vec![
                (
                    trip("T1", "R1", "SH", "WK"),
                    vec![stop_time("A", 100, 1, 0.0), stop_time("B", 200, 2, 0.0)],
                ),
                (
                    trip("T2", "R2", "SH", "WK"),
                    vec![stop_time("B", 150, 1, 0.0), stop_time("C", 250, 2, 0.0)],
                ),
                (
                    trip("LOOP", "GONE", "SH", "WK"),
                    vec![
                        stop_time("B", 120, 1, 0.0),
                        stop_time("C", 180, 2, 0.0),
                        stop_time("B", 240, 3, 0.0),
                    ],
                ),
                (
                    trip("T9", "R1", "SH", "WE"),
                    vec![stop_time("B", 160, 1, 0.0)],
                ),
            ],
            vec![],
            vec![
                Route {
                    route_id: "R1".to_string(),
                    short_name: "L1".to_string(),
                    color: "FF0000".to_string(),
                },
                Route {
                    route_id: "R2".to_string(),
                    short_name: "L2".to_string(),
                    color: String::new(),
                },
            ],
        );
        let services: HashSet<String> = HashSet::from(["WK".to_string()]);
        let trips = active_trips(&index, &services);
        (index, trips)
    }

    #[test]
    fn sorted_upcoming_departures_at_stop() {
        let (index, trips) = board();
        let departures = upcoming_departures(&index, &trips, "B", 0, 10);

        let times: Vec<Time> = departures.iter().map(|d| d.time).collect();
        assert_eq!(times, vec![120, 150, 200, 240]);
        let trips_seen: Vec<&str> = departures.iter().map(|d| d.trip_id.as_str()).collect();
        assert_eq!(trips_seen, vec!["LOOP", "T2", "T1", "LOOP"]);
    }

    #[test]
    fn only_strictly_future_departures() {
        let (index, trips) = board();
        let departures = upcoming_departures(&index, &trips, "B", 150, 10);

        assert!(departures.iter().all(|d| d.time > 150));
        assert_eq!(departures.len(), 2);
    }

    #[test]
    fn truncated_to_limit() {
        let (index, trips) = board();
        assert_eq!(upcoming_departures(&index, &trips, "B", 0, 2).len(), 2);
        assert!(upcoming_departures(&index, &trips, "B", 0, 0).is_empty());
        assert!(upcoming_departures(&index, &trips, "NOWHERE", 0, 10).is_empty());
    }

    #[test]
    fn route_details_with_fallbacks() {
        let (index, trips) = board();
        let departures = upcoming_departures(&index, &trips, "B", 0, 10);

        let t1 = departures.iter().find(|d| d.trip_id == "T1").unwrap();
        assert_eq!(t1.route_short_name, "L1");
        assert_eq!(t1.route_color, "FF0000");
        assert_eq!(t1.headsign, "T1 headsign");

        let t2 = departures.iter().find(|d| d.trip_id == "T2").unwrap();
        assert_eq!(t2.route_color, NEUTRAL_ROUTE_COLOR);

        let unknown = departures.iter().find(|d| d.trip_id == "LOOP").unwrap();
        assert_eq!(unknown.route_short_name, UNKNOWN_ROUTE_SHORT_NAME);
        assert_eq!(unknown.route_color, NEUTRAL_ROUTE_COLOR);
        assert_eq!(unknown.route_id, "GONE");
    }

    #[test]
    fn formats_clock_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(8 * 3600 + 5 * 60 + 59), "08:05");
        assert_eq!(format_time(25 * 3600 + 30 * 60), "01:30");
    }
}
