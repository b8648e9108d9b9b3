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

//! Filter criteria and the filter pass over parsed records.
//!
//! Four predicates are applied in sequence: date range, hour-of-day,
//! severity tag and keyword. They compose by AND, so the order only changes
//! how much work each step does.

use crate::parser::{LogRecord, Severity};
use chrono::{Days, NaiveDate};
use fancy_regex::Regex;
use std::collections::BTreeSet;

pub const MAX_HOUR: u32 = 23;

/// Relative start of the date range; the end is always today
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DatePreset {
    #[default]
    Today,
    Yesterday,
    #[value(name = "last-2-days")]
    Last2Days,
    #[value(name = "last-week")]
    LastWeek,
}

impl DatePreset {
    pub const fn days_back(self) -> u64 {
        match self {
            Self::Today => 0,
            Self::Yesterday => 1,
            Self::Last2Days => 2,
            Self::LastWeek => 7,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Last2Days => "Last 2 Days",
            Self::LastWeek => "Last 1 Week",
        }
    }

    /// Inclusive `(start, end)` dates relative to `today`
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = today
            .checked_sub_days(Days::new(self.days_back()))
            .unwrap_or(NaiveDate::MIN);
        (start, today)
    }
}

/// Hour-of-day bounds coming from two independent controls.
///
/// A numeric start/end pair and a range slider. They are reconciled by
/// taking the widest bounds of both, not by requiring them to agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slider_start: u32,
    pub slider_end: u32,
}

impl HourWindow {
    /// Without a slider value the slider mirrors the numeric inputs.
    /// All inputs are clamped to `0..=23`.
    pub fn new(start_hour: u32, end_hour: u32, slider: Option<(u32, u32)>) -> Self {
        let start_hour = start_hour.min(MAX_HOUR);
        let end_hour = end_hour.min(MAX_HOUR);
        let (slider_start, slider_end) = slider.unwrap_or((start_hour, end_hour));
        Self {
            start_hour,
            end_hour,
            slider_start: slider_start.min(MAX_HOUR),
            slider_end: slider_end.min(MAX_HOUR),
        }
    }

    /// `(min(start, slider_start), max(end, slider_end))`.
    ///
    /// Reversed inputs are kept as they are, so the result may be empty.
    pub fn bounds(&self) -> (u32, u32) {
        (
            self.start_hour.min(self.slider_start),
            self.end_hour.max(self.slider_end),
        )
    }

    pub fn contains(&self, hour: u32) -> bool {
        let (start, end) = self.bounds();
        start <= hour && hour <= end
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self::new(0, MAX_HOUR, None)
    }
}

/// One interaction's worth of filter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub keyword: Option<String>,
    pub severities: BTreeSet<Severity>,
    pub date: DatePreset,
    pub hours: HourWindow,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            keyword: None,
            severities: Severity::ALL.into_iter().collect(),
            date: DatePreset::default(),
            hours: HourWindow::default(),
        }
    }
}

impl FilterCriteria {
    /// Keyword with surrounding whitespace removed, `None` when blank
    pub fn active_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Case-insensitive alternation of the selected tags.
    ///
    /// `None` means the selection is empty and nothing can match.
    pub fn severity_regex(&self) -> Option<Regex> {
        if self.severities.is_empty() {
            return None;
        }
        let alternation = self
            .severities
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?i)\[(?:{alternation})\]");
        match Regex::new(&pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Failed to build severity regex '{pattern}': {e}");
                None
            }
        }
    }
}

/// Apply `criteria` to `records`, keeping file order.
///
/// Records without a timestamp never pass. `today` anchors the date preset.
pub fn apply<'a, I>(records: I, criteria: &FilterCriteria, today: NaiveDate) -> Vec<LogRecord>
where
    I: IntoIterator<Item = &'a LogRecord>,
{
    let (start_date, end_date) = criteria.date.range(today);
    let severity_regex = criteria.severity_regex();
    let keyword = criteria.active_keyword().map(str::to_lowercase);

    let mut considered = 0usize;
    let filtered: Vec<LogRecord> = records
        .into_iter()
        .filter(|r| r.has_timestamp())
        .inspect(|_| considered += 1)
        .filter(|r| r.date.is_some_and(|d| start_date <= d && d <= end_date))
        .filter(|r| r.hour.is_some_and(|h| criteria.hours.contains(h)))
        .filter(|r| {
            severity_regex
                .as_ref()
                .is_some_and(|re| re.is_match(&r.raw_line).unwrap_or(false))
        })
        .filter(|r| {
            keyword
                .as_deref()
                .map_or(true, |k| r.raw_line.to_lowercase().contains(k))
        })
        .cloned()
        .collect();

    let (start_hour, end_hour) = criteria.hours.bounds();
    tracing::debug!(
        "Filter kept {}/{} timed records (dates {start_date}..={end_date}, hours {start_hour}..={end_hour}, {} severities, keyword {:?})",
        filtered.len(),
        considered,
        criteria.severities.len(),
        keyword
    );

    filtered
}
