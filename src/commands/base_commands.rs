use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::domain::daily_report::ReportStatus;
use crate::services::app_config::{MAX_FORECAST_PERIODS, MAX_TREND_DAYS, MAX_WEEKS};

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Optional YAML config file
    #[arg(long, global = true)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Storage file and project filter shared by the analytics commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Tracker storage JSON file
    #[arg(short, long)]
    pub storage: Option<String>,
    /// Only use records of this project id
    #[arg(short, long)]
    pub project: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize one week of daily reports as YAML
    WeeklySummary {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Any day of the week to summarize (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        week: Option<String>,
        /// Output YAML file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compare a week with the week before it
    WeeklyTrends {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Any day of the week to compare (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        week: Option<String>,
        /// Output YAML file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
        /// Print the detailed text report instead of YAML
        #[arg(long)]
        detail: bool,
    },
    /// Print summary cards for the most recent weeks
    WeeklyList {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Number of weeks to list
        #[arg(
            short = 'n',
            long,
            default_value_t = 4,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WEEKS as u64)
        )]
        count: usize,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<String>,
    },
    /// Export the weekly intelligence report as CSV
    WeeklyExport {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Any day of the week to export (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        week: Option<String>,
        /// Output CSV file, defaults to weekly_report_<week start>.csv
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Daily man-hours, tasks, workers, incidents and defects as YAML
    TrendData {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Days to look back from the reference date
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..=MAX_TREND_DAYS))]
        days: Option<i64>,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<String>,
        /// Output YAML file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Task completion progress as YAML
    Progress {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output YAML file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Man-hours and workers per ISO week as YAML
    ResourceUtilization {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Number of most recent weeks to keep
        #[arg(
            short = 'n',
            long,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WEEKS as u64)
        )]
        weeks: Option<usize>,
        /// Output YAML file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Linear forecast of a daily metric
    Forecast {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Daily metric to forecast
        #[arg(short, long, value_enum, default_value_t = ForecastMetric::ManHours)]
        metric: ForecastMetric,
        /// Days of history to fit
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..=MAX_TREND_DAYS))]
        days: Option<i64>,
        /// Number of days to forecast
        #[arg(
            short = 'n',
            long,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_FORECAST_PERIODS as u64)
        )]
        periods: Option<usize>,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<String>,
        /// Output YAML file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render a dashboard chart to a PNG or SVG file
    Plot {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Chart to render
        #[arg(short, long, value_enum)]
        chart: ChartSelection,
        /// Output file, .png or .svg
        #[arg(short, long)]
        output: String,
        /// Chart width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Chart height in pixels
        #[arg(long)]
        height: Option<u32>,
        /// Days of history for the daily charts
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..=MAX_TREND_DAYS))]
        days: Option<i64>,
        /// Weeks of history for the resource chart
        #[arg(
            short = 'n',
            long,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WEEKS as u64)
        )]
        weeks: Option<usize>,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<String>,
        /// Extend line charts with this many forecast days
        #[arg(
            long,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_FORECAST_PERIODS as u64)
        )]
        forecast: Option<usize>,
    },
    /// Manage the stored daily reports
    DailyReports {
        #[command(subcommand)]
        action: DailyReportAction,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum DailyReportAction {
    /// List daily reports, newest first
    List {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Only reports of this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Only reports with this status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// File a new draft report
    Add {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Report day (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Project name shown in exports
        #[arg(long)]
        project_name: Option<String>,
        /// Number of workers on site
        #[arg(short, long, default_value_t = 0)]
        workers: u32,
        /// Hours worked per worker
        #[arg(long, default_value_t = 0.0)]
        hours: f64,
        /// Crew type, e.g. general or electrical
        #[arg(long)]
        crew_type: Option<String>,
        /// Completed task, repeat for several
        #[arg(short, long = "task")]
        tasks: Vec<String>,
        /// Weather condition
        #[arg(long)]
        weather: Option<String>,
        /// Temperature
        #[arg(long)]
        temperature: Option<f64>,
        /// Free text notes
        #[arg(long)]
        notes: Option<String>,
        /// Author of the report
        #[arg(long)]
        created_by: Option<String>,
    },
    /// Change fields of an existing report
    Update {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Report id
        #[arg(long)]
        id: String,
        /// New report day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Number of workers on site
        #[arg(short, long)]
        workers: Option<u32>,
        /// Hours worked per worker
        #[arg(long)]
        hours: Option<f64>,
        /// Completed task, replaces the stored list; repeat for several
        #[arg(short, long = "task")]
        tasks: Vec<String>,
        /// Weather condition
        #[arg(long)]
        weather: Option<String>,
        /// Free text notes
        #[arg(long)]
        notes: Option<String>,
        /// New review status
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Approve a report
    Approve {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Report id
        #[arg(long)]
        id: String,
        /// Name of the approver
        #[arg(long)]
        by: String,
    },
    /// Export all reports as CSV
    ExportCsv {
        #[command(flatten)]
        scope: ScopeArgs,
        /// Output CSV file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForecastMetric {
    ManHours,
    TasksCompleted,
    Workers,
    Incidents,
    Defects,
}

impl ForecastMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMetric::ManHours => "man-hours",
            ForecastMetric::TasksCompleted => "tasks-completed",
            ForecastMetric::Workers => "workers",
            ForecastMetric::Incidents => "incidents",
            ForecastMetric::Defects => "defects",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartSelection {
    Productivity,
    Safety,
    Resources,
    Progress,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Draft,
    Submitted,
    Approved,
}

impl From<StatusArg> for ReportStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Draft => ReportStatus::Draft,
            StatusArg::Submitted => ReportStatus::Submitted,
            StatusArg::Approved => ReportStatus::Approved,
        }
    }
}
