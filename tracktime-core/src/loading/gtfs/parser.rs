use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use super::raw_types::{
    FeedCalendar, FeedCalendarDate, FeedRecord, FeedRoute, FeedShape, FeedStop, FeedStopTime,
    FeedTables, FeedTrip,
};
use crate::Error;

/// Deserialize one GTFS table from any CSV source.
///
/// The header row must contain every column in `T::REQUIRED_COLUMNS`;
/// unknown columns are ignored. Rows shorter than the header read their
/// trailing fields as empty.
///
/// # Errors
///
/// Returns [`Error::MissingColumns`] for an incomplete header and
/// [`Error::CsvError`] if a record cannot be read.
pub fn read_feed_table<T, R>(reader: R) -> Result<Vec<T>, Error>
where
    T: FeedRecord + DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let missing = T::REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::MissingColumns {
            table: T::FILE_NAME,
            columns: missing,
        });
    }

    reader
        .records()
        .map(|record| {
            let mut record = record?;
            while record.len() < headers.len() {
                record.push_field("");
            }
            record.deserialize(Some(&headers))
        })
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(Error::from)
}

/// Deserialize `T::FILE_NAME` from a GTFS directory
pub fn deserialize_gtfs_file<T>(dir: &Path) -> Result<Vec<T>, Error>
where
    T: FeedRecord + DeserializeOwned,
{
    let path = dir.join(T::FILE_NAME);
    let file = File::open(&path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    read_feed_table(file)
}

/// Same as [`deserialize_gtfs_file`], but a missing file yields no rows
fn deserialize_optional_gtfs_file<T>(dir: &Path) -> Result<Vec<T>, Error>
where
    T: FeedRecord + DeserializeOwned,
{
    if dir.join(T::FILE_NAME).exists() {
        deserialize_gtfs_file(dir)
    } else {
        debug!("{} not found in {}", T::FILE_NAME, dir.display());
        Ok(Vec::new())
    }
}

/// Read all tables of one GTFS directory.
///
/// `shapes.txt`, `calendar.txt` and `calendar_dates.txt` are optional.
pub fn load_feed_dir(dir: &Path) -> Result<FeedTables, Error> {
    let calendar: Vec<FeedCalendar> = deserialize_optional_gtfs_file(dir)?;
    let calendar_dates: Vec<FeedCalendarDate> = deserialize_optional_gtfs_file(dir)?;
    if calendar.is_empty() && calendar_dates.is_empty() {
        warn!(
            "{} has neither calendar.txt nor calendar_dates.txt rows, no service will run",
            dir.display()
        );
    }

    Ok(FeedTables {
        stops: deserialize_gtfs_file::<FeedStop>(dir)?,
        routes: deserialize_gtfs_file::<FeedRoute>(dir)?,
        trips: deserialize_gtfs_file::<FeedTrip>(dir)?,
        stop_times: deserialize_gtfs_file::<FeedStopTime>(dir)?,
        shapes: deserialize_optional_gtfs_file::<FeedShape>(dir)?,
        calendar,
        calendar_dates,
    })
}
