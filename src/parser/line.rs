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

use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// One line of an input file after timestamp extraction.
///
/// `timestamp`, `hour` and `date` are either all present or all absent.
/// Records without a timestamp stay in the loaded file but never reach
/// filtering, aggregation or export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub raw_line: String,
    pub timestamp: Option<NaiveDateTime>,
    pub hour: Option<u32>,
    pub date: Option<NaiveDate>,
}

impl LogRecord {
    /// Record for a line that carried no usable timestamp
    pub const fn untimed(raw_line: String) -> Self {
        Self {
            raw_line,
            timestamp: None,
            hour: None,
            date: None,
        }
    }

    pub fn timed(raw_line: String, timestamp: NaiveDateTime) -> Self {
        Self {
            raw_line,
            hour: Some(timestamp.hour()),
            date: Some(timestamp.date()),
            timestamp: Some(timestamp),
        }
    }

    pub const fn has_timestamp(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Case-insensitive check for the bracketed severity tag
    pub fn has_tag(&self, severity: Severity) -> bool {
        self.raw_line
            .to_ascii_uppercase()
            .contains(severity.tag())
    }
}

/// Severity levels the dashboard knows about.
///
/// Ordered the way the dashboard lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    pub const ALL: [Self; 3] = [Self::Error, Self::Warn, Self::Info];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
        }
    }

    /// Bracketed literal as it appears in a log line
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Error => "[ERROR]",
            Self::Warn => "[WARN]",
            Self::Info => "[INFO]",
        }
    }

    /// Plural label used in counts and the distribution table
    pub const fn label(self) -> &'static str {
        match self {
            Self::Error => "Errors",
            Self::Warn => "Warnings",
            Self::Info => "Info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_record_derives_hour_and_date() {
        let ts = NaiveDate::from_ymd_opt(2025, 10, 16)
            .and_then(|d| d.and_hms_opt(18, 30, 20))
            .expect("valid timestamp");
        let record = LogRecord::timed("x".to_string(), ts);
        assert_eq!(record.hour, Some(18));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 10, 16));
        assert!(record.has_timestamp());
    }

    #[test]
    fn test_has_tag_is_case_insensitive() {
        let record = LogRecord::untimed("2025-10-16 18:30:20 [error] boom".to_string());
        assert!(record.has_tag(Severity::Error));
        assert!(!record.has_tag(Severity::Warn));
    }

    #[test]
    fn test_has_tag_needs_brackets() {
        let record = LogRecord::untimed("ERROR without brackets".to_string());
        assert!(!record.has_tag(Severity::Error));
    }
}
