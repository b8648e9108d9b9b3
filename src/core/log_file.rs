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

use crate::core::log_source::SourceError;
use crate::parser::{parse_lines, LogRecord};
use std::path::Path;
use std::time::Instant;

/// A log file read from disk and parsed line by line.
///
/// `records` holds every line, including those without a timestamp.
#[derive(Debug, Clone)]
pub struct LoadedLog {
    pub records: Vec<LogRecord>,
}

/// Reads log files fresh on every call
pub struct LogFileLoader;

impl LogFileLoader {
    pub fn load(path: &Path) -> Result<LoadedLog, SourceError> {
        let start_time = Instant::now();

        let buffer = std::fs::read(path).map_err(|source| {
            tracing::error!("Cannot read file {}: {}", path.display(), source);
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let content = decode_ignoring_errors(&buffer);
        let records = parse_lines(&content);

        tracing::info!(
            "Loaded {} lines ({} bytes) from {} in {:?}",
            records.len(),
            buffer.len(),
            path.display(),
            start_time.elapsed()
        );

        Ok(LoadedLog { records })
    }
}

/// UTF-8 decode that drops invalid byte sequences instead of replacing them
pub fn decode_ignoring_errors(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut dropped = 0usize;
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    if dropped > 0 {
        tracing::debug!("Dropped {dropped} undecodable bytes");
    }
    out
}
