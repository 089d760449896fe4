use std::sync::Arc;

use geo::Point;
use hashbrown::HashMap;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use rayon::prelude::*;

use super::de::{
    parse_coordinate, parse_date, parse_distance, parse_flag, parse_optional_time, parse_sequence,
};
use super::raw_types::{
    FeedCalendar, FeedCalendarDate, FeedRecord, FeedRoute, FeedShape, FeedStop, FeedStopTime,
    FeedTables, FeedTrip,
};
use crate::model::calendar::{
    CalendarEntry, CalendarException, ExceptionKind, ServiceCalendar, WeekdayFlags,
};
use crate::model::shape::{ShapeGeometry, ShapePoint};
use crate::model::types::{Route, Stop, StopTimeEntry, Trip};
use crate::{Distance, Error, RowError, ScheduleIndex, Time};

/// Create the schedule index from raw GTFS tables
///
/// Every row is parsed before anything is indexed, so a malformed feed is
/// reported with all of its bad rows at once.
pub fn schedule_index_from_feed(tables: FeedTables) -> Result<ScheduleIndex, Error> {
    let FeedTables {
        stops,
        routes,
        trips,
        stop_times,
        shapes,
        calendar,
        calendar_dates,
    } = tables;
    let mut errors = RowErrors::default();

    let stops = index_stops(stops, &mut errors);
    let routes = index_routes(routes);
    let trips = index_trips(trips);
    let calendar = build_calendar(calendar, calendar_dates, &mut errors);
    let shape_points = group_shape_points(shapes, &mut errors);
    let trip_stop_times = group_stop_times(stop_times, &trips, &mut errors);

    errors.into_result()?;

    let shapes = build_shapes(shape_points);
    let mut stop_times = order_trip_stop_times(trip_stop_times);
    fill_missing_stop_distances(&mut stop_times, &trips, &stops, &shapes);

    info!(
        "Indexed {} stops, {} routes, {} trips ({} with stop times) and {} shapes",
        stops.len(),
        routes.len(),
        trips.len(),
        stop_times.len(),
        shapes.len()
    );

    Ok(ScheduleIndex {
        stops,
        routes,
        trips,
        stop_times: stop_times
            .into_iter()
            .map(|(trip_id, entries)| (trip_id, Arc::from(entries)))
            .collect(),
        shapes,
        calendar,
    })
}

/// Row failures collected across all tables
#[derive(Default)]
struct RowErrors(Vec<RowError>);

impl RowErrors {
    /// Keeps the value of a parsed row, or records why it failed
    fn check<R: FeedRecord, T>(&mut self, row_idx: usize, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push::<R>(row_idx, message);
                None
            }
        }
    }

    fn push<R: FeedRecord>(&mut self, row_idx: usize, message: String) {
        self.0.push(RowError {
            table: R::FILE_NAME,
            // header is line 1
            line: row_idx + 2,
            message,
        });
    }

    fn into_result(self) -> Result<(), Error> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::MalformedFeed(self.0))
        }
    }
}

fn index_stops(stops: Vec<FeedStop>, errors: &mut RowErrors) -> HashMap<String, Stop> {
    let mut without_location = 0usize;
    let mut indexed = HashMap::with_capacity(stops.len());

    for (idx, feed_stop) in stops.into_iter().enumerate() {
        // Generic nodes and boarding areas may omit coordinates
        if feed_stop.stop_lat.is_empty() && feed_stop.stop_lon.is_empty() {
            without_location += 1;
            continue;
        }

        let geometry = parse_coordinate("stop_lon", &feed_stop.stop_lon).and_then(|lon| {
            parse_coordinate("stop_lat", &feed_stop.stop_lat).map(|lat| Point::new(lon, lat))
        });
        if let Some(geometry) = errors.check::<FeedStop, _>(idx, geometry) {
            indexed.insert(
                feed_stop.stop_id.clone(),
                Stop {
                    stop_id: feed_stop.stop_id,
                    name: feed_stop.stop_name,
                    geometry,
                },
            );
        }
    }

    if without_location > 0 {
        debug!("Skipped {without_location} stops without coordinates");
    }
    indexed
}

fn index_routes(routes: Vec<FeedRoute>) -> HashMap<String, Route> {
    routes
        .into_iter()
        .map(|route| {
            (
                route.route_id.clone(),
                Route {
                    route_id: route.route_id,
                    short_name: route.route_short_name,
                    color: route.route_color.trim_start_matches('#').to_string(),
                },
            )
        })
        .collect()
}

fn index_trips(trips: Vec<FeedTrip>) -> HashMap<String, Arc<Trip>> {
    trips
        .into_iter()
        .map(|trip| {
            (
                trip.trip_id.clone(),
                Arc::new(Trip {
                    trip_id: trip.trip_id,
                    route_id: trip.route_id,
                    shape_id: trip.shape_id,
                    headsign: trip.trip_headsign,
                    service_id: trip.service_id,
                }),
            )
        })
        .collect()
}

fn build_calendar(
    calendar: Vec<FeedCalendar>,
    calendar_dates: Vec<FeedCalendarDate>,
    errors: &mut RowErrors,
) -> ServiceCalendar {
    let entries = calendar
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let entry = parse_calendar_entry(row);
            errors.check::<FeedCalendar, _>(idx, entry)
        })
        .collect();

    let exceptions = calendar_dates
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let exception = parse_date(&row.date).and_then(|date| {
                ExceptionKind::from_gtfs(&row.exception_type).map(|kind| CalendarException {
                    service_id: row.service_id,
                    date,
                    kind,
                })
            });
            errors.check::<FeedCalendarDate, _>(idx, exception)
        })
        .collect();

    ServiceCalendar::new(entries, exceptions)
}

fn parse_calendar_entry(row: FeedCalendar) -> Result<CalendarEntry, String> {
    let days = [
        parse_flag("monday", &row.monday)?,
        parse_flag("tuesday", &row.tuesday)?,
        parse_flag("wednesday", &row.wednesday)?,
        parse_flag("thursday", &row.thursday)?,
        parse_flag("friday", &row.friday)?,
        parse_flag("saturday", &row.saturday)?,
        parse_flag("sunday", &row.sunday)?,
    ];

    Ok(CalendarEntry {
        service_id: row.service_id,
        weekdays: WeekdayFlags::from_bools(days),
        start_date: parse_date(&row.start_date)?,
        end_date: parse_date(&row.end_date)?,
    })
}

fn group_shape_points(
    shapes: Vec<FeedShape>,
    errors: &mut RowErrors,
) -> HashMap<String, Vec<ShapePoint>> {
    let mut grouped: HashMap<String, Vec<ShapePoint>> = HashMap::new();

    for (idx, row) in shapes.into_iter().enumerate() {
        let point = parse_shape_point(&row);
        if let Some(point) = errors.check::<FeedShape, _>(idx, point) {
            grouped.entry(row.shape_id).or_default().push(point);
        }
    }
    grouped
}

fn parse_shape_point(row: &FeedShape) -> Result<ShapePoint, String> {
    let lon = parse_coordinate("shape_pt_lon", &row.shape_pt_lon)?;
    let lat = parse_coordinate("shape_pt_lat", &row.shape_pt_lat)?;

    Ok(ShapePoint {
        geometry: Point::new(lon, lat),
        sequence: parse_sequence("shape_pt_sequence", &row.shape_pt_sequence)?,
        distance: parse_distance(&row.shape_dist_traveled)?,
    })
}

fn build_shapes(
    shape_points: HashMap<String, Vec<ShapePoint>>,
) -> HashMap<String, Arc<ShapeGeometry>> {
    shape_points
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .filter_map(|(shape_id, points)| match ShapeGeometry::new(shape_id.clone(), points) {
            Some(shape) => Some((shape_id, Arc::new(shape))),
            None => {
                warn!("Dropping shape {shape_id}: shape_dist_traveled decreases along the sequence");
                None
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Stop time as read, before untimed stops are resolved
#[derive(Debug, Clone)]
struct PendingStopTime {
    row_idx: usize,
    stop_id: String,
    arrival: Option<Time>,
    stop_sequence: u32,
    shape_dist: Distance,
}

fn group_stop_times(
    stop_times: Vec<FeedStopTime>,
    trips: &HashMap<String, Arc<Trip>>,
    errors: &mut RowErrors,
) -> HashMap<String, Vec<PendingStopTime>> {
    let mut grouped: HashMap<String, Vec<PendingStopTime>> = HashMap::new();
    let mut unknown_trip_rows = 0usize;

    for (idx, row) in stop_times.into_iter().enumerate() {
        let parsed = parse_stop_time(idx, &row);
        let Some(pending) = errors.check::<FeedStopTime, _>(idx, parsed) else {
            continue;
        };
        if !trips.contains_key(row.trip_id.as_str()) {
            unknown_trip_rows += 1;
            continue;
        }
        grouped.entry(row.trip_id).or_default().push(pending);
    }

    if unknown_trip_rows > 0 {
        debug!("Dropped {unknown_trip_rows} stop times referencing unknown trips");
    }
    for (trip_id, pending) in &grouped {
        check_trip_endpoints(trip_id, pending, errors);
    }
    grouped
}

/// Untimed stops can only be interpolated between two timed ones, so the
/// first and last stop of every trip must carry a time
fn check_trip_endpoints(trip_id: &str, pending: &[PendingStopTime], errors: &mut RowErrors) {
    let (Some(first), Some(last)) = (
        pending.iter().min_by_key(|s| s.stop_sequence),
        pending.iter().max_by_key(|s| s.stop_sequence),
    ) else {
        return;
    };

    if first.arrival.is_none() {
        errors.push::<FeedStopTime>(
            first.row_idx,
            format!("trip {trip_id} starts at a stop without arrival_time or departure_time"),
        );
    }
    if last.arrival.is_none() && last.row_idx != first.row_idx {
        errors.push::<FeedStopTime>(
            last.row_idx,
            format!("trip {trip_id} ends at a stop without arrival_time or departure_time"),
        );
    }
}

fn parse_stop_time(row_idx: usize, row: &FeedStopTime) -> Result<PendingStopTime, String> {
    let arrival = match parse_optional_time(&row.arrival_time)? {
        Some(time) => Some(time),
        None => parse_optional_time(&row.departure_time)?,
    };

    Ok(PendingStopTime {
        row_idx,
        stop_id: row.stop_id.clone(),
        arrival,
        stop_sequence: parse_sequence("stop_sequence", &row.stop_sequence)?,
        shape_dist: parse_distance(&row.shape_dist_traveled)?,
    })
}

/// Sort every trip by stop sequence and reject trips that cannot be ordered
fn order_trip_stop_times(
    trip_stop_times: HashMap<String, Vec<PendingStopTime>>,
) -> HashMap<String, Vec<StopTimeEntry>> {
    trip_stop_times
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .filter_map(|(trip_id, pending)| match order_stop_times(pending) {
            Ok(entries) => Some((trip_id, entries)),
            Err(reason) => {
                warn!("Rejecting trip {trip_id}: {reason}");
                None
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

fn order_stop_times(mut pending: Vec<PendingStopTime>) -> Result<Vec<StopTimeEntry>, String> {
    pending.sort_by_key(|s| s.stop_sequence);

    if let Some((duplicate, _)) = pending
        .iter()
        .tuple_windows()
        .find(|(prev, next)| prev.stop_sequence == next.stop_sequence)
    {
        return Err(format!("duplicate stop_sequence {}", duplicate.stop_sequence));
    }

    let times = resolve_untimed_stops(&pending)?;
    let entries: Vec<StopTimeEntry> = pending
        .into_iter()
        .zip(times)
        .map(|(p, arrival)| StopTimeEntry {
            stop_id: p.stop_id,
            arrival,
            stop_sequence: p.stop_sequence,
            shape_dist: p.shape_dist,
        })
        .collect();

    if let Some((_, next)) = entries
        .iter()
        .tuple_windows()
        .find(|(prev, next)| next.arrival < prev.arrival)
    {
        return Err(format!(
            "arrival time decreases at stop_sequence {}",
            next.stop_sequence
        ));
    }

    Ok(entries)
}

/// Arrival times for every stop, interpolating stops that carry no time.
///
/// Untimed stops between two timed ones are spread by shape distance when
/// the distances are known and increasing, otherwise evenly by position.
fn resolve_untimed_stops(pending: &[PendingStopTime]) -> Result<Vec<Time>, String> {
    let (Some(first), Some(last)) = (pending.first(), pending.last()) else {
        return Ok(Vec::new());
    };
    if first.arrival.is_none() || last.arrival.is_none() {
        return Err("first and last stop must have a time".to_string());
    }

    let timed: Vec<(usize, Time)> = pending
        .iter()
        .enumerate()
        .filter_map(|(idx, s)| s.arrival.map(|time| (idx, time)))
        .collect();

    let mut times = vec![0; pending.len()];
    for ((start_idx, start_time), (end_idx, end_time)) in timed.iter().copied().tuple_windows() {
        times[start_idx] = start_time;
        times[end_idx] = end_time;
        if end_idx - start_idx < 2 {
            continue;
        }

        let start_dist = pending[start_idx].shape_dist;
        let span_dist = pending[end_idx].shape_dist - start_dist;
        let by_distance = span_dist > 0.0
            && pending[start_idx..=end_idx]
                .iter()
                .tuple_windows()
                .all(|(prev, next)| next.shape_dist >= prev.shape_dist);
        let span_time = f64::from(end_time.saturating_sub(start_time));

        for idx in start_idx + 1..end_idx {
            let fraction = if by_distance {
                (pending[idx].shape_dist - start_dist) / span_dist
            } else {
                (idx - start_idx) as f64 / (end_idx - start_idx) as f64
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let offset = (span_time * fraction).round() as Time;
            times[idx] = start_time + offset;
        }
    }
    if let [(only_idx, only_time)] = timed.as_slice() {
        times[*only_idx] = *only_time;
    }

    Ok(times)
}

/// Derive stop distances for trips whose feed gives none.
///
/// Stops are snapped to shape vertices in visiting order, see
/// [`ShapeGeometry::snap_in_order`]. Trips with an unknown shape or stop
/// keep their zeros.
fn fill_missing_stop_distances(
    stop_times: &mut HashMap<String, Vec<StopTimeEntry>>,
    trips: &HashMap<String, Arc<Trip>>,
    stops: &HashMap<String, Stop>,
    shapes: &HashMap<String, Arc<ShapeGeometry>>,
) {
    let mut filled = 0usize;

    for (trip_id, entries) in stop_times.iter_mut() {
        if entries.len() < 2 || entries.iter().any(|e| e.shape_dist != 0.0) {
            continue;
        }
        let Some(shape) = trips
            .get(trip_id.as_str())
            .and_then(|trip| shapes.get(trip.shape_id.as_str()))
        else {
            continue;
        };

        if let Some(distances) = snap_stops_to_shape(entries, stops, shape) {
            for (entry, distance) in entries.iter_mut().zip(distances) {
                entry.shape_dist = distance;
            }
            filled += 1;
        } else {
            trace!("Trip {trip_id} references a stop without location, distances stay unknown");
        }
    }

    if filled > 0 {
        debug!("Derived shape distances for {filled} trips from stop locations");
    }
}

fn snap_stops_to_shape(
    entries: &[StopTimeEntry],
    stops: &HashMap<String, Stop>,
    shape: &ShapeGeometry,
) -> Option<Vec<Distance>> {
    let locations = entries
        .iter()
        .map(|entry| stops.get(entry.stop_id.as_str()).map(|stop| stop.geometry))
        .collect::<Option<Vec<_>>>()?;
    let vertices = shape.snap_in_order(&locations)?;

    Some(
        vertices
            .into_iter()
            .map(|vertex| shape.points()[vertex].distance)
            .collect(),
    )
}
