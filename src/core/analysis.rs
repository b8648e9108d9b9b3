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

//! One dashboard interaction: load, filter and aggregate a log file.

use crate::core::aggregate::SeverityBuckets;
use crate::core::filter::{self, FilterCriteria};
use crate::core::log_file::LogFileLoader;
use crate::core::log_source::SourceError;
use crate::parser::LogRecord;
use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub criteria: FilterCriteria,
    pub today: NaiveDate,
    /// Lines read from the file, with or without timestamp
    pub total_lines: usize,
    /// Lines dropped from analysis for lack of a timestamp
    pub untimed_lines: usize,
    pub filtered: Vec<LogRecord>,
}

impl Analysis {
    /// Read `path` fresh and run the filter pass over it
    pub fn run(path: &Path, criteria: FilterCriteria, today: NaiveDate) -> Result<Self, SourceError> {
        let loaded = LogFileLoader::load(path)?;
        Ok(Self::from_records(&loaded.records, criteria, today))
    }

    pub fn from_records(records: &[LogRecord], criteria: FilterCriteria, today: NaiveDate) -> Self {
        let filtered = filter::apply(records, &criteria, today);
        let untimed_lines = records.iter().filter(|r| !r.has_timestamp()).count();

        Self {
            criteria,
            today,
            total_lines: records.len(),
            untimed_lines,
            filtered,
        }
    }

    pub fn buckets(&self) -> SeverityBuckets<'_> {
        SeverityBuckets::compute(&self.filtered)
    }
}
