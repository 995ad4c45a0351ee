use tracing::info;

use crate::commands::base_commands::ScopeArgs;
use crate::commands::command_context::{
    CommandError, TrackerData, parse_date, write_output, write_yaml,
};
use crate::commands::report_format::{
    format_weekly_card, format_weekly_detail, format_weekly_export, weekly_export_file_name,
};
use crate::services::app_config::AppConfig;
use crate::services::week_calendar::{recent_week_starts, week_start_of};
use crate::services::weekly_analytics::WeeklyAnalytics;

pub fn weekly_summary_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    week: Option<&str>,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let week_start = week_start_of(parse_date(week)?);

    let summary = WeeklyAnalytics::new(&data.reports)
        .generate_weekly_from_daily(week_start, project_id.as_ref());
    info!(%week_start, reports = summary.total_reports, "computed weekly summary");
    write_yaml(output, &summary, "Weekly summary")
}

pub fn weekly_trends_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    week: Option<&str>,
    output: Option<&str>,
    detail: bool,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let week_start = week_start_of(parse_date(week)?);

    let comparison =
        WeeklyAnalytics::new(&data.reports).get_weekly_trends(week_start, project_id.as_ref());
    if detail {
        let report = format_weekly_detail(&comparison, &data.project_name(project_id.as_ref()));
        write_output(output, &report)?;
        if let Some(path) = output {
            println!("Weekly report written to {path}");
        }
        return Ok(());
    }
    write_yaml(output, &comparison, "Weekly trends")
}

pub fn weekly_list_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    count: usize,
    today: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let analytics = WeeklyAnalytics::new(&data.reports);

    let cards: Vec<String> = recent_week_starts(parse_date(today)?, count)
        .into_iter()
        .map(|week_start| {
            let comparison = analytics.get_weekly_trends(week_start, project_id.as_ref());
            format_weekly_card(&comparison.current, &comparison.trends)
        })
        .collect();
    write_output(None, &cards.join("\n\n"))
}

pub fn weekly_export_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    week: Option<&str>,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let week_start = week_start_of(parse_date(week)?);

    let summary = WeeklyAnalytics::new(&data.reports)
        .generate_weekly_from_daily(week_start, project_id.as_ref());
    let contents = format_weekly_export(&summary, &data.project_name(project_id.as_ref()))?;
    let path = output
        .map(str::to_string)
        .unwrap_or_else(|| weekly_export_file_name(&summary));
    write_output(Some(&path), &contents)?;
    println!("Weekly report exported to {path}");
    Ok(())
}
