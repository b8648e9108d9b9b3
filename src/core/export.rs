// LogDash - GPL-3.0-or-later
// This file is part of LogDash.
//
// Copyright (C) 2025 Daniel Freiermuth
//
// LogDash is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogDash is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogDash.  If not, see <https://www.gnu.org/licenses/>.

//! CSV export of the filtered record set.

use crate::core::log_source::SourceError;
use crate::parser::LogRecord;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

pub const EXPORT_FILE_NAME: &str = "filtered_logs.csv";

const CSV_HEADER: [&str; 4] = ["raw_line", "timestamp", "hour", "date"];

/// One exported row. Missing values become empty fields.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    raw_line: &'a str,
    timestamp: Option<String>,
    hour: Option<u32>,
    date: Option<String>,
}

impl<'a> From<&'a LogRecord> for CsvRow<'a> {
    fn from(record: &'a LogRecord) -> Self {
        Self {
            raw_line: &record.raw_line,
            timestamp: record
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            hour: record.hour,
            date: record.date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Write the header and one row per record.
///
/// The header is written even when `records` is empty.
fn write_rows<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    records: &[LogRecord],
) -> Result<(), csv::Error> {
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `filtered_logs.csv` into `dir`, creating the directory if needed
pub fn write_csv(dir: &Path, records: &[LogRecord]) -> Result<PathBuf, SourceError> {
    std::fs::create_dir_all(dir).map_err(|source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(EXPORT_FILE_NAME);
    let csv_error = |source| SourceError::Csv {
        path: path.clone(),
        source,
    };
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .map_err(csv_error)?;
    write_rows(&mut wtr, records).map_err(csv_error)?;

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}
