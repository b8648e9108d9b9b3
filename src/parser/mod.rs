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

pub mod line;

pub use line::{LogRecord, Severity};

use chrono::NaiveDateTime;
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Leading `YYYY-MM-DD HH:MM:SS`, anything may follow
static LEADING_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})").expect("valid regex literal")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse one raw line into a [`LogRecord`].
///
/// The line is trimmed first. A line whose prefix looks like a timestamp
/// but names an impossible date or time (month 13, hour 24) is treated the
/// same as a line without one.
pub fn parse_line(raw: &str) -> LogRecord {
    let trimmed = raw.trim();

    match extract_timestamp(trimmed) {
        Some(ts) => LogRecord::timed(trimmed.to_string(), ts),
        None => LogRecord::untimed(trimmed.to_string()),
    }
}

/// Extract the leading timestamp of a trimmed line, if any
pub fn extract_timestamp(line: &str) -> Option<NaiveDateTime> {
    let caps = LEADING_TIMESTAMP.captures(line).ok()??;
    NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()
}

/// Parse every line of a decoded file, keeping file order
pub fn parse_lines(content: &str) -> Vec<LogRecord> {
    let records: Vec<LogRecord> = content.lines().map(parse_line).collect();
    tracing::debug!(
        "Parsed {} lines, {} without timestamp",
        records.len(),
        records.iter().filter(|r| !r.has_timestamp()).count()
    );
    records
}
