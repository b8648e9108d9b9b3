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

//! Discovery of log files under the dashboard's folder structure.
//!
//! Layout is `<root>/<subfolder>/<file>` with a fixed list of subfolders.
//! Only files with one of the configured extensions are picked up.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Log folder not found at: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write CSV {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unknown log file '{name}'. Available: {}", .available.join(", "))]
    UnknownFile {
        name: String,
        available: Vec<String>,
    },
}

/// A discovered log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    /// Display name, `<subfolder>/<file name>`
    pub name: String,
    pub path: PathBuf,
}

/// Scans the log root for selectable files
#[derive(Debug, Clone)]
pub struct LogDirectory {
    root: PathBuf,
    subfolders: Vec<String>,
    extensions: Vec<String>,
}

impl LogDirectory {
    pub fn new(root: PathBuf, subfolders: Vec<String>, extensions: Vec<String>) -> Self {
        Self {
            root,
            subfolders,
            extensions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List log files in subfolder order, file names sorted within each.
    ///
    /// A missing root is an error. Missing subfolders are skipped.
    pub fn discover(&self) -> Result<Vec<LogSource>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::MissingRoot(self.root.clone()));
        }

        let mut sources = Vec::new();
        for sub in &self.subfolders {
            let subdir = self.root.join(sub);
            if !subdir.is_dir() {
                tracing::debug!("Skipping missing subfolder {}", subdir.display());
                continue;
            }

            let entries = std::fs::read_dir(&subdir).map_err(|source| SourceError::Io {
                path: subdir.clone(),
                source,
            })?;

            let mut found: Vec<LogSource> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && self.has_log_extension(path))
                .filter_map(|path| {
                    let file_name = path.file_name()?.to_str()?.to_string();
                    Some(LogSource {
                        name: format!("{sub}/{file_name}"),
                        path,
                    })
                })
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));

            tracing::debug!("Found {} log files in {}", found.len(), subdir.display());
            sources.extend(found);
        }

        Ok(sources)
    }

    /// Pick a source by display name, or the first one when no name is given
    pub fn select<'a>(
        sources: &'a [LogSource],
        name: Option<&str>,
    ) -> Result<Option<&'a LogSource>, SourceError> {
        let Some(name) = name else {
            return Ok(sources.first());
        };

        sources
            .iter()
            .find(|s| s.name == name)
            .map(Some)
            .ok_or_else(|| SourceError::UnknownFile {
                name: name.to_string(),
                available: sources.iter().map(|s| s.name.clone()).collect(),
            })
    }

    fn has_log_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn directory(root: &Path) -> LogDirectory {
        LogDirectory::new(
            root.to_path_buf(),
            vec!["api".to_string(), "etl".to_string(), "scheduler".to_string()],
            vec!["log".to_string(), "txt".to_string()],
        )
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");
        let err = directory(&missing).discover().expect_err("root is missing");
        assert!(matches!(err, SourceError::MissingRoot(_)));
        assert!(err.to_string().starts_with("Log folder not found at:"));
    }

    #[test]
    fn test_empty_root_finds_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sources = directory(dir.path()).discover().expect("discover");
        assert!(sources.is_empty());
    }

    #[test]
    fn test_discovers_only_log_and_txt_in_known_subfolders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        for sub in ["api", "etl", "other"] {
            fs::create_dir_all(root.join(sub)).expect("mkdir");
        }
        fs::write(root.join("api/b.log"), "").expect("write");
        fs::write(root.join("api/a.txt"), "").expect("write");
        fs::write(root.join("api/c.csv"), "").expect("write");
        fs::write(root.join("etl/etl.log"), "").expect("write");
        fs::write(root.join("other/x.log"), "").expect("write");
        fs::write(root.join("top.log"), "").expect("write");

        let names: Vec<String> = directory(root)
            .discover()
            .expect("discover")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["api/a.txt", "api/b.log", "etl/etl.log"]);
    }

    #[test]
    fn test_select_defaults_to_first() {
        let sources = vec![
            LogSource {
                name: "api/a.log".to_string(),
                path: PathBuf::from("a"),
            },
            LogSource {
                name: "etl/b.log".to_string(),
                path: PathBuf::from("b"),
            },
        ];
        let first = LogDirectory::select(&sources, None).expect("select");
        assert_eq!(first.map(|s| s.name.as_str()), Some("api/a.log"));

        let named = LogDirectory::select(&sources, Some("etl/b.log")).expect("select");
        assert_eq!(named.map(|s| s.path.clone()), Some(PathBuf::from("b")));

        let err = LogDirectory::select(&sources, Some("nope")).expect_err("unknown");
        assert!(err.to_string().contains("api/a.log, etl/b.log"));
    }

    #[test]
    fn test_select_on_empty_list() {
        assert!(LogDirectory::select(&[], None).expect("select").is_none());
    }
}
