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

//! Plain-text rendering of the dashboard.

use crate::core::aggregate::{MessageFrequency, SeverityBuckets};
use crate::core::analysis::Analysis;
use crate::parser::{LogRecord, Severity};
use std::fmt;

/// Width of the longest bar in the distribution chart
const BAR_WIDTH: usize = 40;

/// Log sections that can be expanded below the metrics row
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ShowSection {
    All,
    Errors,
    Warnings,
    Info,
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub show: Vec<ShowSection>,
    pub lines_to_show: usize,
}

/// Render the full dashboard for one analysis
pub fn render(source_name: &str, analysis: &Analysis, options: &ReportOptions) -> String {
    Dashboard {
        source_name,
        analysis,
        options,
    }
    .to_string()
}

struct Dashboard<'a> {
    source_name: &'a str,
    analysis: &'a Analysis,
    options: &'a ReportOptions,
}

impl fmt::Display for Dashboard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.analysis;
        let buckets = analysis.buckets();

        writeln!(f, "Log file: {}", self.source_name)?;
        write_filters(f, analysis)?;
        writeln!(
            f,
            "Total Lines: {} | Errors: {} | Warnings: {} | Info: {}",
            analysis.filtered.len(),
            buckets.error.len(),
            buckets.warn.len(),
            buckets.info.len()
        )?;
        if analysis.untimed_lines > 0 {
            writeln!(
                f,
                "({} of {} lines had no timestamp and were skipped)",
                analysis.untimed_lines, analysis.total_lines
            )?;
        }

        for section in &self.options.show {
            writeln!(f)?;
            write_section(f, *section, analysis, &buckets, self.options.lines_to_show)?;
        }

        writeln!(f)?;
        write_distribution(f, &buckets)
    }
}

fn write_filters(f: &mut fmt::Formatter<'_>, analysis: &Analysis) -> fmt::Result {
    let criteria = &analysis.criteria;
    let (start_date, end_date) = criteria.date.range(analysis.today);
    let (start_hour, end_hour) = criteria.hours.bounds();
    let types = if criteria.severities.is_empty() {
        "none".to_string()
    } else {
        criteria
            .severities
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(
        f,
        "Filters: {} ({start_date} to {end_date}), hours {start_hour}-{end_hour}, types {types}, keyword {}",
        criteria.date.label(),
        criteria.active_keyword().unwrap_or("-")
    )
}

fn write_section(
    f: &mut fmt::Formatter<'_>,
    section: ShowSection,
    analysis: &Analysis,
    buckets: &SeverityBuckets<'_>,
    limit: usize,
) -> fmt::Result {
    match section {
        ShowSection::All => {
            writeln!(f, "== All Logs ==")?;
            write_lines(f, analysis.filtered.iter(), limit)
        }
        ShowSection::Errors => {
            write_bucket(f, "Error Logs", buckets, Severity::Error, limit)?;
            buckets.top_messages(Severity::Error).map_or(Ok(()), |top| {
                writeln!(f)?;
                write_top_messages(f, "Top 10 Error Messages", &top)
            })
        }
        ShowSection::Warnings => {
            write_bucket(f, "Warning Logs", buckets, Severity::Warn, limit)?;
            buckets.top_messages(Severity::Warn).map_or(Ok(()), |top| {
                writeln!(f)?;
                write_top_messages(f, "Top 10 Warning Messages", &top)
            })
        }
        ShowSection::Info => write_bucket(f, "Info Logs", buckets, Severity::Info, limit),
    }
}

fn write_bucket(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    buckets: &SeverityBuckets<'_>,
    severity: Severity,
    limit: usize,
) -> fmt::Result {
    writeln!(f, "== {title} ==")?;
    write_lines(f, buckets.get(severity).iter().copied(), limit)
}

fn write_lines<'a>(
    f: &mut fmt::Formatter<'_>,
    records: impl Iterator<Item = &'a LogRecord>,
    limit: usize,
) -> fmt::Result {
    let mut shown = 0;
    for record in records.take(limit) {
        writeln!(f, "{:<5} {}", row_marker(&record.raw_line), record.raw_line)?;
        shown += 1;
    }
    if shown == 0 {
        writeln!(f, "(no lines)")?;
    }
    Ok(())
}

/// Row label by the first tag found, matched case-sensitively
fn row_marker(line: &str) -> &'static str {
    Severity::ALL
        .into_iter()
        .find(|s| line.contains(s.tag()))
        .map_or("", Severity::as_str)
}

fn write_top_messages(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    rows: &[MessageFrequency],
) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "{:>6}  Message", "Count")?;
    for row in rows {
        writeln!(f, "{:>6}  {}", row.count, row.message)?;
    }
    Ok(())
}

fn write_distribution(f: &mut fmt::Formatter<'_>, buckets: &SeverityBuckets<'_>) -> fmt::Result {
    let rows = buckets.distribution();
    let max = rows.iter().map(|r| r.count).max().unwrap_or(0);

    writeln!(f, "== Log Type Distribution ==")?;
    for row in rows {
        let bar_len = if max == 0 {
            0
        } else {
            (row.count * BAR_WIDTH).div_ceil(max)
        };
        writeln!(
            f,
            "{:<9} {:>6}  {}",
            row.severity.label(),
            row.count,
            "#".repeat(bar_len)
        )?;
    }
    Ok(())
}

/// Render insight texts under their bucket headings
pub fn render_insights(insights: &[(Severity, String)]) -> String {
    let mut out = String::from("== AI-Powered Log Insights ==\n");
    if insights.is_empty() {
        out.push_str("(no errors or warnings to analyze)\n");
    }
    for (severity, text) in insights {
        let heading = match severity {
            Severity::Error => "Error Insights",
            Severity::Warn => "Warning Insights",
            Severity::Info => "Info Insights",
        };
        out.push_str(&format!("\n-- {heading} --\n{text}\n"));
    }
    out
}
