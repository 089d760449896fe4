use std::path::PathBuf;

use chrono::NaiveDate;

/// Configuration for loading a timetable
#[derive(Debug, Clone, Default)]
pub struct TimetableConfig {
    /// GTFS directories, merged in order
    pub gtfs_dirs: Vec<PathBuf>,
    /// Service date to activate, today's local date when `None`
    pub date: Option<NaiveDate>,
}

impl TimetableConfig {
    pub fn new(gtfs_dirs: Vec<PathBuf>) -> Self {
        Self {
            gtfs_dirs,
            date: None,
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
