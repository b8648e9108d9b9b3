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

//! Severity buckets and message frequency tables.

use crate::parser::{LogRecord, Severity};
use indexmap::IndexMap;

/// Number of rows kept in each message frequency table
pub const TOP_MESSAGES: usize = 10;

/// Occurrence count of one distinct log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFrequency {
    pub message: String,
    pub count: usize,
}

/// One row of the severity distribution table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionRow {
    pub severity: Severity,
    pub count: usize,
}

/// Filtered records split by severity tag.
///
/// Each bucket is an independent case-insensitive substring test, so a line
/// carrying two tags lands in both buckets.
#[derive(Debug, Clone, Default)]
pub struct SeverityBuckets<'a> {
    pub error: Vec<&'a LogRecord>,
    pub warn: Vec<&'a LogRecord>,
    pub info: Vec<&'a LogRecord>,
}

impl<'a> SeverityBuckets<'a> {
    pub fn compute(filtered: &'a [LogRecord]) -> Self {
        let bucket = |severity: Severity| -> Vec<&'a LogRecord> {
            filtered.iter().filter(|r| r.has_tag(severity)).collect()
        };

        let buckets = Self {
            error: bucket(Severity::Error),
            warn: bucket(Severity::Warn),
            info: bucket(Severity::Info),
        };
        tracing::debug!(
            "Buckets from {} records: error={}, warn={}, info={}",
            filtered.len(),
            buckets.error.len(),
            buckets.warn.len(),
            buckets.info.len()
        );
        buckets
    }

    pub fn get(&self, severity: Severity) -> &[&'a LogRecord] {
        match severity {
            Severity::Error => &self.error,
            Severity::Warn => &self.warn,
            Severity::Info => &self.info,
        }
    }

    /// Bucket sizes in Errors, Warnings, Info order, regardless of filters
    pub fn distribution(&self) -> [DistributionRow; 3] {
        Severity::ALL.map(|severity| DistributionRow {
            severity,
            count: self.get(severity).len(),
        })
    }

    /// Top messages of a bucket, `None` for an empty bucket
    pub fn top_messages(&self, severity: Severity) -> Option<Vec<MessageFrequency>> {
        let bucket = self.get(severity);
        if bucket.is_empty() {
            None
        } else {
            Some(top_messages(bucket.iter().copied(), TOP_MESSAGES))
        }
    }

    /// Raw lines of a bucket in file order
    pub fn lines(&self, severity: Severity) -> Vec<String> {
        self.get(severity)
            .iter()
            .map(|r| r.raw_line.clone())
            .collect()
    }
}

/// Count distinct raw lines and keep the `limit` most frequent.
///
/// Sorted by count descending. Equal counts keep first-seen order.
pub fn top_messages<'a, I>(records: I, limit: usize) -> Vec<MessageFrequency>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in records {
        *counts.entry(record.raw_line.as_str()).or_insert(0) += 1;
    }

    let mut rows: Vec<MessageFrequency> = counts
        .into_iter()
        .map(|(message, count)| MessageFrequency {
            message: message.to_string(),
            count,
        })
        .collect();
    // sort_by is stable
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{self, DatePreset, FilterCriteria};
    use crate::parser::parse_line;
    use chrono::NaiveDate;

    fn records(lines: &[&str]) -> Vec<LogRecord> {
        lines.iter().map(|l| parse_line(l)).collect()
    }

    #[test]
    fn test_three_line_example_bucket_sizes() {
        let filtered = records(&[
            "2025-10-16 18:30:20 [ERROR] timeout",
            "2025-10-16 18:30:22 [INFO] retry",
        ]);
        let buckets = SeverityBuckets::compute(&filtered);
        let sizes: Vec<(Severity, usize)> = buckets
            .distribution()
            .iter()
            .map(|row| (row.severity, row.count))
            .collect();
        assert_eq!(
            sizes,
            vec![
                (Severity::Error, 1),
                (Severity::Warn, 0),
                (Severity::Info, 1)
            ]
        );
    }

    #[test]
    fn test_buckets_may_overlap() {
        let filtered = records(&["2025-10-16 18:30:20 [ERROR] upstream said [WARN] too"]);
        let buckets = SeverityBuckets::compute(&filtered);
        assert_eq!(buckets.error.len(), 1);
        assert_eq!(buckets.warn.len(), 1);
        assert!(buckets.info.is_empty());
    }

    #[test]
    fn test_error_filter_equals_error_bucket() {
        let all = records(&[
            "2025-10-16 18:30:20 [ERROR] timeout",
            "2025-10-16 18:30:21 [warn] slow",
            "2025-10-16 18:30:22 [INFO] retry",
            "2025-10-16 18:30:23 [Error] again",
            "2025-10-16 18:30:24 [INFO] relay [ERROR] from peer",
            "no timestamp [ERROR]",
        ]);
        let today = NaiveDate::from_ymd_opt(2025, 10, 16).expect("valid date");

        let everything = filter::apply(&all, &FilterCriteria::default(), today);
        let buckets = SeverityBuckets::compute(&everything);

        let only_errors = FilterCriteria {
            severities: [Severity::Error].into_iter().collect(),
            date: DatePreset::Today,
            ..FilterCriteria::default()
        };
        let errors = filter::apply(&all, &only_errors, today);

        let from_filter: Vec<&str> = errors.iter().map(|r| r.raw_line.as_str()).collect();
        let from_bucket: Vec<&str> = buckets.error.iter().map(|r| r.raw_line.as_str()).collect();
        assert_eq!(from_filter, from_bucket);
        assert_eq!(from_filter.len(), 3);
    }

    #[test]
    fn test_top_messages_sorted_and_truncated() {
        let mut lines = Vec::new();
        for i in 0..15 {
            for _ in 0..=(i % 4) {
                lines.push(format!("2025-10-16 10:00:00 [ERROR] failure {i}"));
            }
        }
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let recs = records(&refs);

        let top = top_messages(&recs, TOP_MESSAGES);
        assert_eq!(top.len(), TOP_MESSAGES);
        assert!(top.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(top[0].count, 4);
        assert_eq!(top[0].message, "2025-10-16 10:00:00 [ERROR] failure 3");
    }

    #[test]
    fn test_top_messages_ties_keep_first_seen_order() {
        let recs = records(&[
            "2025-10-16 10:00:00 [WARN] b",
            "2025-10-16 10:00:00 [WARN] a",
            "2025-10-16 10:00:00 [WARN] c",
            "2025-10-16 10:00:00 [WARN] a",
            "2025-10-16 10:00:00 [WARN] b",
        ]);
        let top = top_messages(&recs, TOP_MESSAGES);
        let order: Vec<(&str, usize)> = top
            .iter()
            .map(|f| (f.message.as_str(), f.count))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2025-10-16 10:00:00 [WARN] b", 2),
                ("2025-10-16 10:00:00 [WARN] a", 2),
                ("2025-10-16 10:00:00 [WARN] c", 1),
            ]
        );
    }

    #[test]
    fn test_empty_bucket_has_no_table() {
        let filtered = records(&["2025-10-16 10:00:00 [INFO] fine"]);
        let buckets = SeverityBuckets::compute(&filtered);
        assert!(buckets.top_messages(Severity::Error).is_none());
        assert_eq!(
            buckets.top_messages(Severity::Info).map(|t| t.len()),
            Some(1)
        );
    }

    #[test]
    fn test_distribution_of_empty_set() {
        let buckets = SeverityBuckets::compute(&[]);
        assert!(buckets.distribution().iter().all(|row| row.count == 0));
    }
}
