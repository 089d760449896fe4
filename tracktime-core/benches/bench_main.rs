use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use tracktime_core::loading::gtfs::{
    FeedCalendar, FeedRoute, FeedShape, FeedStop, FeedStopTime, FeedTables, FeedTrip,
};
use tracktime_core::{ScheduleIndex, Timetable};

const LINES: usize = 20;
const TRIPS_PER_LINE: usize = 60;
const STOPS_PER_LINE: usize = 25;
const SHAPE_POINTS_PER_STOP: usize = 8;

fn clock(seconds: usize) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// A grid of straight lines, each served every 15 minutes from 05:00
fn synthetic_feed() -> FeedTables {
    let mut tables = FeedTables::default();
    tables.calendar.push(FeedCalendar {
        service_id: "ALL".to_string(),
        monday: "1".to_string(),
        tuesday: "1".to_string(),
        wednesday: "1".to_string(),
        thursday: "1".to_string(),
        friday: "1".to_string(),
        saturday: "1".to_string(),
        sunday: "1".to_string(),
        start_date: "20240101".to_string(),
        end_date: "20251231".to_string(),
    });

    for line in 0..LINES {
        let lat = 40.0 + line as f64 * 0.01;
        tables.routes.push(FeedRoute {
            route_id: format!("R{line}"),
            route_short_name: format!("{line}"),
            route_color: "3366CC".to_string(),
        });

        for point in 0..STOPS_PER_LINE * SHAPE_POINTS_PER_STOP {
            tables.shapes.push(FeedShape {
                shape_id: format!("SH{line}"),
                shape_pt_lat: lat.to_string(),
                shape_pt_lon: (-3.8 + point as f64 * 0.0005).to_string(),
                shape_pt_sequence: point.to_string(),
                shape_dist_traveled: String::new(),
            });
        }
        for stop in 0..STOPS_PER_LINE {
            tables.stops.push(FeedStop {
                stop_id: format!("S{line}_{stop}"),
                stop_name: format!("Stop {line}/{stop}"),
                stop_lat: lat.to_string(),
                stop_lon: (-3.8 + (stop * SHAPE_POINTS_PER_STOP) as f64 * 0.0005).to_string(),
            });
        }

        for trip in 0..TRIPS_PER_LINE {
            let trip_id = format!("T{line}_{trip}");
            tables.trips.push(FeedTrip {
                route_id: format!("R{line}"),
                service_id: "ALL".to_string(),
                trip_id: trip_id.clone(),
                trip_headsign: format!("Terminal {line}"),
                shape_id: format!("SH{line}"),
            });
            let start = 5 * 3600 + trip * 900;
            for stop in 0..STOPS_PER_LINE {
                let time = clock(start + stop * 120);
                tables.stop_times.push(FeedStopTime {
                    trip_id: trip_id.clone(),
                    arrival_time: time.clone(),
                    departure_time: time,
                    stop_id: format!("S{line}_{stop}"),
                    stop_sequence: (stop + 1).to_string(),
                    shape_dist_traveled: String::new(),
                });
            }
        }
    }
    tables
}

fn bench_index_build(c: &mut Criterion) {
    let tables = synthetic_feed();
    c.bench_function("schedule_index_build", |b| {
        b.iter(|| ScheduleIndex::build(black_box(tables.clone())))
    });
}

fn bench_queries(c: &mut Criterion) {
    let index = ScheduleIndex::build(synthetic_feed()).expect("synthetic feed is valid");
    let date = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date");
    let timetable = Timetable::new(index, date);

    c.bench_function("vehicle_positions", |b| {
        b.iter(|| timetable.vehicle_positions(black_box(8 * 3600 + 17 * 60)))
    });
    c.bench_function("upcoming_departures", |b| {
        b.iter(|| timetable.upcoming_departures(black_box("S7_12"), black_box(8 * 3600), 10))
    });
}

criterion_group!(benches, bench_index_build, bench_queries);
criterion_main!(benches);
