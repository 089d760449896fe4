use serde::Deserialize;

/// A row type of one GTFS table
pub trait FeedRecord {
    /// File name inside a GTFS directory
    const FILE_NAME: &'static str;
    /// Columns that must be present in the header row
    const REQUIRED_COLUMNS: &'static [&'static str];
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

impl FeedRecord for FeedStop {
    const FILE_NAME: &'static str = "stops.txt";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["stop_id", "stop_name", "stop_lat", "stop_lon"];
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedRoute {
    pub route_id: String,
    pub route_short_name: String,
    pub route_color: String,
}

impl FeedRecord for FeedRoute {
    const FILE_NAME: &'static str = "routes.txt";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["route_id", "route_short_name", "route_color"];
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedTrip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub trip_headsign: String,
    pub shape_id: String,
}

impl FeedRecord for FeedTrip {
    const FILE_NAME: &'static str = "trips.txt";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["route_id", "service_id", "trip_id", "trip_headsign", "shape_id"];
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedStopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: String,
    pub shape_dist_traveled: String,
}

impl FeedRecord for FeedStopTime {
    const FILE_NAME: &'static str = "stop_times.txt";
    const REQUIRED_COLUMNS: &'static [&'static str] =
        &["trip_id", "arrival_time", "stop_id", "stop_sequence"];
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedShape {
    pub shape_id: String,
    pub shape_pt_lat: String,
    pub shape_pt_lon: String,
    pub shape_pt_sequence: String,
    pub shape_dist_traveled: String,
}

impl FeedRecord for FeedShape {
    const FILE_NAME: &'static str = "shapes.txt";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "shape_id",
        "shape_pt_lat",
        "shape_pt_lon",
        "shape_pt_sequence",
    ];
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedCalendar {
    pub service_id: String,
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
    pub start_date: String,
    pub end_date: String,
}

impl FeedRecord for FeedCalendar {
    const FILE_NAME: &'static str = "calendar.txt";
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "service_id",
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
        "start_date",
        "end_date",
    ];
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedCalendarDate {
    pub service_id: String,
    pub date: String,
    pub exception_type: String,
}

impl FeedRecord for FeedCalendarDate {
    const FILE_NAME: &'static str = "calendar_dates.txt";
    const REQUIRED_COLUMNS: &'static [&'static str] = &["service_id", "date", "exception_type"];
}

/// The seven raw tables the schedule index is built from
#[derive(Debug, Default, Clone)]
pub struct FeedTables {
    pub stops: Vec<FeedStop>,
    pub routes: Vec<FeedRoute>,
    pub trips: Vec<FeedTrip>,
    pub stop_times: Vec<FeedStopTime>,
    pub shapes: Vec<FeedShape>,
    pub calendar: Vec<FeedCalendar>,
    pub calendar_dates: Vec<FeedCalendarDate>,
}

impl FeedTables {
    /// Appends the rows of another feed
    pub fn extend(&mut self, other: FeedTables) {
        self.stops.extend(other.stops);
        self.routes.extend(other.routes);
        self.trips.extend(other.trips);
        self.stop_times.extend(other.stop_times);
        self.shapes.extend(other.shapes);
        self.calendar.extend(other.calendar);
        self.calendar_dates.extend(other.calendar_dates);
    }

    pub fn shrink_to_fit(&mut self) {
        self.stops.shrink_to_fit();
        self.routes.shrink_to_fit();
        self.trips.shrink_to_fit();
        self.stop_times.shrink_to_fit();
        self.shapes.shrink_to_fit();
        self.calendar.shrink_to_fit();
        self.calendar_dates.shrink_to_fit();
    }
}
