use serde::Serialize;
use tracing::info;

use crate::commands::base_commands::{ForecastMetric, ScopeArgs};
use crate::commands::command_context::{CommandError, TrackerData, parse_date, write_yaml};
use crate::services::app_config::AppConfig;
use crate::services::visual_analytics::{
    DailyTrendPoint, ForecastPoint, VisualAnalytics, forecast_trend,
};

#[derive(Serialize, Debug)]
struct ForecastReport<'a> {
    metric: &'a str,
    observed_days: usize,
    forecast: Vec<ForecastPoint>,
}

fn metric_value(point: &DailyTrendPoint, metric: ForecastMetric) -> f64 {
    match metric {
        ForecastMetric::ManHours => point.man_hours,
        ForecastMetric::TasksCompleted => point.tasks_completed as f64,
        ForecastMetric::Workers => f64::from(point.workers),
        ForecastMetric::Incidents => point.incidents as f64,
        ForecastMetric::Defects => point.defects as f64,
    }
}

pub fn trend_data_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    days: Option<i64>,
    today: Option<&str>,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let analytics = VisualAnalytics::new(&data.reports, &data.tasks, &data.projects);

    let points = analytics.generate_trend_data(
        project_id.as_ref(),
        days.unwrap_or(config.trend_days),
        parse_date(today)?,
    );
    write_yaml(output, &points, "Trend data")
}

pub fn progress_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let analytics = VisualAnalytics::new(&data.reports, &data.tasks, &data.projects);

    let progress = analytics
        .calculate_cumulative_progress(project_id.as_ref())
        .ok_or_else(|| {
            CommandError::UnknownProject(
                project_id
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            )
        })?;
    write_yaml(output, &progress, "Progress")
}

pub fn resource_utilization_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    weeks: Option<usize>,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let analytics = VisualAnalytics::new(&data.reports, &data.tasks, &data.projects);

    let utilization = analytics.get_resource_utilization_data(
        project_id.as_ref(),
        weeks.unwrap_or(config.utilization_weeks),
    );
    write_yaml(output, &utilization, "Resource utilization")
}

pub fn forecast_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    metric: ForecastMetric,
    days: Option<i64>,
    periods: Option<usize>,
    today: Option<&str>,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let analytics = VisualAnalytics::new(&data.reports, &data.tasks, &data.projects);

    let points = analytics.generate_trend_data(
        project_id.as_ref(),
        days.unwrap_or(config.trend_days),
        parse_date(today)?,
    );
    let values: Vec<f64> = points
        .iter()
        .map(|point| metric_value(point, metric))
        .collect();
    let forecast = forecast_trend(&values, periods.unwrap_or(config.forecast_periods));
    info!(
        metric = metric.as_str(),
        observed = values.len(),
        forecast = forecast.len(),
        "computed forecast"
    );

    let report = ForecastReport {
        metric: metric.as_str(),
        observed_days: values.len(),
        forecast,
    };
    write_yaml(output, &report, "Forecast")
}
