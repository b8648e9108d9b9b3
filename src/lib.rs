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

//! `LogDash` - a production-support log dashboard.
//!
//! Reads service logs from `<root>/{api,etl,scheduler}`, filters them by
//! keyword, severity, date and hour-of-day, and summarizes the result.
//! Error and warning lines can be sent to a chat-completion model for a
//! written analysis.

pub mod config;
pub mod core;
pub mod insight;
pub mod parser;
pub mod report;
pub mod splitter;
