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

//! Writes the built-in sample log into the dashboard's folder structure.
//!
//! The sample is one block of text with two marker comments. Lines before
//! the first marker belong to the ETL job, then come the API and the
//! scheduler sections.

use crate::core::log_source::SourceError;
use std::path::{Path, PathBuf};

pub const SAMPLE_LOGS: &str = include_str!("sample_logs.txt");

pub const API_MARKER: &str = "# API logs";
pub const SCHEDULER_MARKER: &str = "# Scheduler and Monitoring logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Etl,
    Api,
    Scheduler,
}

impl Section {
    pub const ALL: [Self; 3] = [Self::Etl, Self::Api, Self::Scheduler];

    pub const fn subfolder(self) -> &'static str {
        match self {
            Self::Etl => "etl",
            Self::Api => "api",
            Self::Scheduler => "scheduler",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Etl => "etl_logs.log",
            Self::Api => "api_logs.log",
            Self::Scheduler => "scheduler_logs.log",
        }
    }
}

/// Trimmed, non-blank lines of each section in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition<'a> {
    pub etl: Vec<&'a str>,
    pub api: Vec<&'a str>,
    pub scheduler: Vec<&'a str>,
}

impl<'a> Partition<'a> {
    pub fn section(&self, section: Section) -> &[&'a str] {
        match section {
            Section::Etl => &self.etl,
            Section::Api => &self.api,
            Section::Scheduler => &self.scheduler,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<&'a str> {
        match section {
            Section::Etl => &mut self.etl,
            Section::Api => &mut self.api,
            Section::Scheduler => &mut self.scheduler,
        }
    }
}

/// Split `text` on the two marker lines. Marker lines themselves are dropped.
pub fn partition(text: &str) -> Partition<'_> {
    let mut partition = Partition::default();
    let mut current = Section::Etl;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.contains(API_MARKER) {
            current = Section::Api;
            continue;
        }
        if line.contains(SCHEDULER_MARKER) {
            current = Section::Scheduler;
            continue;
        }
        partition.section_mut(current).push(line);
    }

    partition
}

/// A file written by [`write_sections`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub lines: usize,
}

/// Write one file per section under `root`, overwriting existing files.
///
/// All three files are always written, even when a section is empty.
pub fn write_sections(root: &Path, text: &str) -> Result<Vec<WrittenFile>, SourceError> {
    let partition = partition(text);
    let mut written = Vec::with_capacity(Section::ALL.len());

    for section in Section::ALL {
        let dir = root.join(section.subfolder());
        std::fs::create_dir_all(&dir).map_err(|source| SourceError::Io {
            path: dir.clone(),
            source,
        })?;

        let lines = partition.section(section);
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        let path = dir.join(section.file_name());
        std::fs::write(&path, content).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Wrote {} lines to {}", lines.len(), path.display());
        written.push(WrittenFile {
            path,
            lines: lines.len(),
        });
    }

    Ok(written)
}
