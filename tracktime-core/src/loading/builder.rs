use chrono::Local;
use log::info;

use super::config::TimetableConfig;
use super::gtfs::{FeedTables, load_feed_dir};
use crate::{Error, ScheduleIndex, Timetable};

/// Load every configured GTFS directory and build the schedule index
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a file cannot be read,
/// or any row of the merged feed is malformed.
pub fn create_schedule_index(config: &TimetableConfig) -> Result<ScheduleIndex, Error> {
    validate_config(config)?;

    let mut tables = FeedTables::default();
    for dir in &config.gtfs_dirs {
        info!("Reading GTFS feed: {}", dir.display());
        tables.extend(load_feed_dir(dir)?);
    }
    tables.shrink_to_fit();

    info!(
        "Read {} stop times and {} shape points",
        tables.stop_times.len(),
        tables.shapes.len()
    );
    ScheduleIndex::build(tables)
}

/// Creates a timetable for the configured date, or for today
///
/// # Errors
///
/// See [`create_schedule_index`].
pub fn create_timetable(config: &TimetableConfig) -> Result<Timetable, Error> {
    let index = create_schedule_index(config)?;
    let date = config
        .date
        .unwrap_or_else(|| Local::now().date_naive());

    let timetable = Timetable::new(index, date);
    info!(
        "Timetable for {date}: {} active services, {} active trips",
        timetable.active_services().len(),
        timetable.active_trips().len()
    );
    Ok(timetable)
}

fn validate_config(config: &TimetableConfig) -> Result<(), Error> {
    if config.gtfs_dirs.is_empty() {
        return Err(Error::InvalidData(
            "No GTFS directories provided in the configuration".to_string(),
        ));
    }

    for dir in &config.gtfs_dirs {
        if !dir.is_dir() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("GTFS directory not found: {}", dir.display()),
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn empty_directory_list_is_rejected() {
        let err = create_schedule_index(&TimetableConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn missing_directory_is_rejected() {
        let config = TimetableConfig::new(vec![PathBuf::from("/no/such/gtfs")]);
        let err = create_timetable(&config).unwrap_err();
        assert!(matches!(err, Error::IoError(e) if e.kind() == std::io::ErrorKind::NotFound));
    }
}
