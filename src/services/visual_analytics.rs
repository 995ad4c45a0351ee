use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::domain::daily_report::DailyReport;
use crate::domain::project::Project;
use crate::domain::record_id::RecordId;
use crate::domain::task::Task;
use crate::services::week_calendar::{IsoWeekKey, week_start_of};

pub const DEFAULT_TREND_DAYS: i64 = 30;
pub const DEFAULT_UTILIZATION_WEEKS: usize = 12;
pub const DEFAULT_FORECAST_PERIODS: usize = 7;
pub const ALL_PROJECTS: &str = "All Projects";

/// Totals of every report filed on one calendar day.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    pub man_hours: f64,
    pub tasks_completed: usize,
    pub workers: u32,
    pub incidents: usize,
    pub defects: usize,
}

impl DailyTrendPoint {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            man_hours: 0.0,
            tasks_completed: 0,
            workers: 0,
            incidents: 0,
            defects: 0,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub project_name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub progress: u32,
}

impl ProgressSummary {
    pub fn remaining_tasks(&self) -> usize {
        self.total_tasks.saturating_sub(self.completed_tasks)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeeklyUtilization {
    pub week: String,
    pub start_date: NaiveDate,
    pub man_hours: f64,
    pub workers: u32,
    pub reports: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub label: String,
    pub value: f64,
}

/// Derives chart-ready series from a snapshot of daily reports and tasks.
pub struct VisualAnalytics<'a> {
    reports: &'a [DailyReport],
    tasks: &'a [Task],
    projects: &'a [Project],
}

impl<'a> VisualAnalytics<'a> {
    pub fn new(reports: &'a [DailyReport], tasks: &'a [Task], projects: &'a [Project]) -> Self {
        Self {
            reports,
            tasks,
            projects,
        }
    }

    /// One point per distinct report date in `[today - days, today]`.
    /// Days without reports are absent rather than zero-filled. A window
    /// reaching past the start of the calendar is cut off there.
    pub fn generate_trend_data(
        &self,
        project_id: Option<&RecordId>,
        days: i64,
        today: NaiveDate,
    ) -> Vec<DailyTrendPoint> {
        let start = Duration::try_days(days)
            .and_then(|span| today.checked_sub_signed(span))
            .unwrap_or(NaiveDate::MIN);
        let mut by_date: BTreeMap<NaiveDate, DailyTrendPoint> = BTreeMap::new();

        for report in self
            .reports
            .iter()
            .filter(|report| report.date >= start && report.date <= today)
            .filter(|report| report.belongs_to(project_id))
        {
            let point = by_date
                .entry(report.date)
                .or_insert_with(|| DailyTrendPoint::empty(report.date));
            point.man_hours += report.man_hours();
            point.tasks_completed += report.task_count();
            point.workers += report.workers();
            if report.mentions_incident() {
                point.incidents += 1;
            }
            if report.mentions_defect() {
                point.defects += 1;
            }
        }

        debug!(points = by_date.len(), days, "generated trend data");
        by_date.into_values().collect()
    }

    /// Task completion for one project, or for all tasks without a filter.
    /// Returns `None` when the requested project does not exist.
    pub fn calculate_cumulative_progress(
        &self,
        project_id: Option<&RecordId>,
    ) -> Option<ProgressSummary> {
        let (project_name, tasks): (String, Vec<&Task>) = match project_id {
            Some(id) => {
                let project = self.projects.iter().find(|project| &project.id == id)?;
                let tasks = self
                    .tasks
                    .iter()
                    .filter(|task| task.project_id.as_ref() == Some(id))
                    .collect();
                (project.name.clone(), tasks)
            }
            None => (ALL_PROJECTS.to_string(), self.tasks.iter().collect()),
        };

        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|task| task.is_completed()).count();
        let progress = if total_tasks > 0 {
            (completed_tasks as f64 / total_tasks as f64 * 100.0).round() as u32
        } else {
            0
        };

        Some(ProgressSummary {
            project_name,
            total_tasks,
            completed_tasks,
            progress,
        })
    }

    /// Man-hours and head count per ISO week, the most recent `weeks`
    /// buckets in chronological order.
    pub fn get_resource_utilization_data(
        &self,
        project_id: Option<&RecordId>,
        weeks: usize,
    ) -> Vec<WeeklyUtilization> {
        let mut by_week: BTreeMap<IsoWeekKey, WeeklyUtilization> = BTreeMap::new();

        for report in self
            .reports
            .iter()
            .filter(|report| report.belongs_to(project_id))
        {
            let key = IsoWeekKey::of(report.date);
            let bucket = by_week.entry(key).or_insert_with(|| WeeklyUtilization {
                week: key.to_string(),
                start_date: week_start_of(report.date),
                man_hours: 0.0,
                workers: 0,
                reports: 0,
            });
            bucket.man_hours += report.man_hours();
            bucket.workers += report.workers();
            bucket.reports += 1;
        }

        let skip = by_week.len().saturating_sub(weeks);
        by_week.into_values().skip(skip).collect()
    }
}

/// Least-squares line through `(index, value)`, extended `periods` steps past
/// the last point. Forecasts never go below zero.
pub fn forecast_trend(values: &[f64], periods: usize) -> Vec<ForecastPoint> {
    if values.len() < 2 {
        return Vec::new();
    }

    let n = values.len() as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = values.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sum_x, sum_y, sum_xy, sum_xx), (index, value)| {
            let x = index as f64;
            (sum_x + x, sum_y + value, sum_xy + x * value, sum_xx + x * x)
        },
    );

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;
    debug!(slope, intercept, "fitted forecast line");

    (0..periods)
        .map(|step| {
            let future_index = values.len() + step;
            ForecastPoint {
                label: format!("Forecast +{}d", step + 1),
                value: (slope * future_index as f64 + intercept).max(0.0),
            }
        })
        .collect()
}
