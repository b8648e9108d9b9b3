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

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use logdash::config::{api_key_from_env, AppConfig};
use logdash::core::filter::{DatePreset, FilterCriteria, HourWindow, MAX_HOUR};
use logdash::core::{export, Analysis, LogDirectory};
use logdash::insight::{CancelToken, CompletionClient, InsightRequestor, OpenAiClient};
use logdash::parser::Severity;
use logdash::report::{self, ReportOptions, ShowSection};
use logdash::splitter;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "logdash")]
#[command(author = "LogDash Team")]
#[command(version)]
#[command(about = "Filter, summarize and explain production support logs", long_about = None)]
struct Args {
    /// Config file to use instead of the one in the user config directory
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log root folder, overrides the configured one
    #[arg(long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the log files found under the log root
    Files,
    /// Filter one log file and print the dashboard
    Analyze(AnalyzeArgs),
    /// Write the built-in sample logs into the folder structure
    Split,
    /// Write the default configuration file
    InitConfig,
}

#[derive(ClapArgs, Debug)]
struct AnalyzeArgs {
    /// Log file as listed by `files`, e.g. `api/api_logs.log` (default: first file)
    #[arg(long, value_name = "NAME")]
    file: Option<String>,

    /// Case-insensitive text the lines must contain
    #[arg(long, short)]
    keyword: Option<String>,

    /// Log types to keep, comma separated; pass the flag without values to select none
    #[arg(long = "type", value_enum, ignore_case = true, value_delimiter = ',', num_args = 0..)]
    types: Option<Vec<Severity>>,

    /// Date range ending today
    #[arg(long, value_enum, default_value_t = DatePreset::Today)]
    date: DatePreset,

    /// Start hour (0-23)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=23))]
    start_hour: u32,

    /// End hour (0-23)
    #[arg(long, default_value_t = MAX_HOUR, value_parser = clap::value_parser!(u32).range(0..=23))]
    end_hour: u32,

    /// Quick-select start hour, widens the numeric range
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    slider_start: Option<u32>,

    /// Quick-select end hour, widens the numeric range
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    slider_end: Option<u32>,

    /// Log sections to print in full
    #[arg(long, value_enum, value_delimiter = ',')]
    show: Vec<ShowSection>,

    /// Number of log lines to display per section (10-500)
    #[arg(long, value_name = "N")]
    lines: Option<usize>,

    /// Write filtered_logs.csv into this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Ask the completion model for error and warning insights
    #[arg(long)]
    insights: bool,

    /// Override today's date
    #[arg(long, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,
}

impl AnalyzeArgs {
    fn criteria(&self) -> FilterCriteria {
        let severities: BTreeSet<Severity> = self
            .types
            .as_ref()
            .map_or_else(|| Severity::ALL.into_iter().collect(), |t| t.iter().copied().collect());

        let slider = if self.slider_start.is_some() || self.slider_end.is_some() {
            Some((
                self.slider_start.unwrap_or(self.start_hour),
                self.slider_end.unwrap_or(self.end_hour),
            ))
        } else {
            None
        };

        FilterCriteria {
            keyword: self.keyword.clone(),
            severities,
            date: self.date,
            hours: HourWindow::new(self.start_hour, self.end_hour, slider),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG to override (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("LogDash starting up (version {})", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load(args.config.as_deref());
    if let Some(root) = args.root {
        config.log_root = root;
    }

    match args.command {
        Command::Files => list_files(&config),
        Command::Analyze(analyze_args) => analyze(&config, &analyze_args),
        Command::Split => split(&config),
        Command::InitConfig => init_config(args.config.as_deref()),
    }
}

/// Write the built-in defaults, ignoring `--root` and any existing file
fn init_config(path: Option<&Path>) -> anyhow::Result<()> {
    let path = AppConfig::default()
        .save(path)
        .context("Failed to write config")?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn log_directory(config: &AppConfig) -> LogDirectory {
    LogDirectory::new(
        config.log_root.clone(),
        config.subfolders.clone(),
        config.extensions.clone(),
    )
}

fn list_files(config: &AppConfig) -> anyhow::Result<()> {
    let sources = log_directory(config).discover()?;
    if sources.is_empty() {
        tracing::warn!("No log files found under {}", config.log_root.display());
        println!("No log files found in subfolders.");
    }
    for source in sources {
        println!("{}", source.name);
    }
    Ok(())
}

fn analyze(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let directory = log_directory(config);
    let sources = directory.discover()?;
    if sources.is_empty() {
        tracing::warn!("No log files found under {}", directory.root().display());
        println!("No log files found in subfolders.");
        return Ok(());
    }

    let Some(source) = LogDirectory::select(&sources, args.file.as_deref())? else {
        return Ok(());
    };

    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let analysis = Analysis::run(&source.path, args.criteria(), today)
        .with_context(|| format!("Failed to analyze {}", source.name))?;

    let options = ReportOptions {
        show: args.show.clone(),
        lines_to_show: AppConfig::clamp_lines_to_show(args.lines.unwrap_or(config.lines_to_show)),
    };
    print!("{}", report::render(&source.name, &analysis, &options));

    if let Some(dir) = &args.export {
        let path = export::write_csv(dir, &analysis.filtered)?;
        println!(
            "\nExported {} filtered lines to {}",
            analysis.filtered.len(),
            path.display()
        );
    }

    if args.insights {
        println!("\n{}", request_insights(config, &analysis));
    }

    Ok(())
}

/// Insights for the error and warning buckets, each only when non-empty
fn request_insights(config: &AppConfig, analysis: &Analysis) -> String {
    let client = match OpenAiClient::new(&config.insight, api_key_from_env()) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Cannot create completion client: {e}");
            return report::render_insights(&[(
                Severity::Error,
                format!("Error generating insights: {e}"),
            )]);
        }
    };
    let requestor = InsightRequestor::new(
        config.insight.clone(),
        Arc::new(client) as Arc<dyn CompletionClient>,
    );
    let cancel = CancelToken::new();
    let buckets = analysis.buckets();

    let insights: Vec<(Severity, String)> = [Severity::Error, Severity::Warn]
        .into_iter()
        .map(|severity| (severity, buckets.lines(severity)))
        .filter(|(_, lines)| !lines.is_empty())
        .map(|(severity, lines)| {
            let text = requestor.request(&lines, config.insight.max_tokens, &cancel);
            (severity, text)
        })
        .collect();

    report::render_insights(&insights)
}

fn split(config: &AppConfig) -> anyhow::Result<()> {
    let written = splitter::write_sections(&config.log_root, splitter::SAMPLE_LOGS)?;
    for file in &written {
        println!("{} ({} lines)", file.path.display(), file.lines);
    }
    println!("Logs segregated into folders successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let args = Args::try_parse_from(argv.iter().copied()).expect("valid arguments");
        match args.command {
            Command::Analyze(analyze) => Some(analyze),
            Command::Files | Command::Split | Command::InitConfig => None,
        }
        .expect("analyze command")
    }

    #[test]
    fn test_types_default_to_all() {
        let criteria = analyze_args(&["logdash", "analyze"]).criteria();
        assert_eq!(
            criteria.severities,
            Severity::ALL.into_iter().collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_type_flag_without_values_selects_none() {
        let criteria = analyze_args(&["logdash", "analyze", "--type"]).criteria();
        assert!(criteria.severities.is_empty());
    }

    #[test]
    fn test_type_names_are_case_insensitive() {
        let criteria = analyze_args(&["logdash", "analyze", "--type", "error,WARN"]).criteria();
        assert_eq!(
            criteria.severities,
            BTreeSet::from([Severity::Error, Severity::Warn])
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(Args::try_parse_from(["logdash", "analyze", "--type", "warning"]).is_err());
    }

    #[test]
    fn test_lone_slider_end_takes_start_from_start_hour() {
        let criteria = analyze_args(&[
            "logdash",
            "analyze",
            "--start-hour",
            "10",
            "--end-hour",
            "12",
            "--slider-end",
            "20",
        ])
        .criteria();
        assert_eq!(criteria.hours.bounds(), (10, 20));
    }

    #[test]
    fn test_hour_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["logdash", "analyze", "--end-hour", "24"]).is_err());
    }

    #[test]
    fn test_init_config_writes_defaults_over_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let custom = AppConfig {
            log_root: PathBuf::from("/srv/logs"),
            lines_to_show: 200,
            ..AppConfig::default()
        };
        custom.save(Some(path.as_path())).expect("save custom");

        init_config(Some(path.as_path())).expect("init config");

        assert_eq!(AppConfig::load(Some(path.as_path())), AppConfig::default());
    }
}
