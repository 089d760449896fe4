//! Reading raw GTFS tables and processing them into a schedule index

mod de;
mod parser;
mod processor;
mod raw_types;

pub use de::parse_time;
pub use parser::{deserialize_gtfs_file, load_feed_dir, read_feed_table};
pub use processor::schedule_index_from_feed;
pub use raw_types::{
    FeedCalendar, FeedCalendarDate, FeedRecord, FeedRoute, FeedShape, FeedStop, FeedStopTime,
    FeedTables, FeedTrip,
};
