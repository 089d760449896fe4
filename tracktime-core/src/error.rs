use std::fmt;

use thiserror::Error;

/// A single rejected row of a feed table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// File name of the table, e.g. `stop_times.txt`
    pub table: &'static str,
    /// 1-based line number in the file, header included
    pub line: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.table, self.line, self.message)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("{table} is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<&'static str>,
    },
    #[error("Malformed feed, {} invalid row(s): {}", .0.len(), summarize(.0))]
    MalformedFeed(Vec<RowError>),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}

fn summarize(rows: &[RowError]) -> String {
    const SHOWN: usize = 5;

    let mut summary = rows
        .iter()
        .take(SHOWN)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if rows.len() > SHOWN {
        summary.push_str(&format!("; and {} more", rows.len() - SHOWN));
    }
    summary
}
