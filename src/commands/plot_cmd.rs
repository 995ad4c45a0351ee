use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::commands::base_commands::{ChartSelection, ScopeArgs};
use crate::commands::command_context::{CommandError, TrackerData, parse_date};
use crate::domain::record_id::RecordId;
use crate::services::app_config::AppConfig;
use crate::services::chart_data::{
    PROGRESS_CHART_ID, PRODUCTIVITY_CHART_ID, RESOURCE_CHART_ID, SAFETY_CHART_ID, productivity_chart,
    progress_chart, resource_chart, safety_chart,
};
use crate::services::drawing_surface::{DrawingSurface, SurfaceError, SurfaceSet};
use crate::services::plotters_surface::PlottersSurface;
use crate::services::simple_chart::{Chart, ChartConfig, ChartPoint, ChartRegistry, SimpleChart};
use crate::services::visual_analytics::{VisualAnalytics, forecast_trend};

/// History window for the dashboard charts.
pub struct ChartWindow {
    pub days: i64,
    pub weeks: usize,
    pub today: NaiveDate,
}

/// Surface id and chart for one dashboard panel.
pub fn dashboard_chart(
    analytics: &VisualAnalytics<'_>,
    selection: ChartSelection,
    project_id: Option<&RecordId>,
    window: &ChartWindow,
) -> Result<(&'static str, Chart), CommandError> {
    let chart = match selection {
        ChartSelection::Productivity => (
            PRODUCTIVITY_CHART_ID,
            productivity_chart(&analytics.generate_trend_data(
                project_id,
                window.days,
                window.today,
            )),
        ),
        ChartSelection::Safety => (
            SAFETY_CHART_ID,
            safety_chart(&analytics.generate_trend_data(project_id, window.days, window.today)),
        ),
        ChartSelection::Resources => (
            RESOURCE_CHART_ID,
            resource_chart(&analytics.get_resource_utilization_data(project_id, window.weeks)),
        ),
        ChartSelection::Progress => {
            let progress = analytics
                .calculate_cumulative_progress(project_id)
                .ok_or_else(|| {
                    CommandError::UnknownProject(
                        project_id.map(ToString::to_string).unwrap_or_default(),
                    )
                })?;
            (PROGRESS_CHART_ID, progress_chart(&progress))
        }
    };
    Ok(chart)
}

/// Appends `periods` forecast points to a line chart and redraws it.
/// Other chart kinds, and lines with fewer than two points, stay as they are.
fn extend_with_forecast<S: DrawingSurface>(
    chart: &mut SimpleChart<S>,
    periods: usize,
) -> Result<(), SurfaceError> {
    let Chart::Line(line) = chart.chart() else {
        return Ok(());
    };
    let values: Vec<f64> = line.data.iter().map(ChartPoint::value).collect();
    let forecast = forecast_trend(&values, periods);
    if forecast.is_empty() {
        return Ok(());
    }

    let mut data = line.data.clone();
    let mut labels = line.labels.clone();
    for point in forecast {
        labels.push(point.label.clone());
        data.push(ChartPoint::labelled(point.label, point.value, None));
    }
    chart.update_data(data, labels)
}

fn render_to<S: DrawingSurface>(
    surface: S,
    surface_id: &str,
    config: ChartConfig,
    forecast: Option<usize>,
) -> Result<(), CommandError> {
    let mut surfaces = SurfaceSet::new();
    surfaces.insert(surface_id, surface);
    let mut registry = ChartRegistry::new(surfaces);
    let chart = registry.get_or_create(surface_id, config)?;
    if let (Some(chart), Some(periods)) = (chart, forecast) {
        extend_with_forecast(chart, periods)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn plot_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    selection: ChartSelection,
    output: &str,
    width: Option<u32>,
    height: Option<u32>,
    days: Option<i64>,
    weeks: Option<usize>,
    today: Option<&str>,
    forecast: Option<usize>,
) -> Result<(), CommandError> {
    let path = Path::new(output);
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(extension.as_deref(), Some("png") | Some("svg")) {
        return Err(CommandError::UnsupportedChartFormat(output.to_string()));
    }

    let data = TrackerData::load(config, scope)?;
    let project_id = config.project_id(scope.project.as_deref());
    let analytics = VisualAnalytics::new(&data.reports, &data.tasks, &data.projects);
    let window = ChartWindow {
        days: days.unwrap_or(config.trend_days),
        weeks: weeks.unwrap_or(config.utilization_weeks),
        today: parse_date(today)?,
    };
    let (surface_id, chart) = dashboard_chart(&analytics, selection, project_id.as_ref(), &window)?;

    let size = (
        width.unwrap_or(config.chart_width),
        height.unwrap_or(config.chart_height),
    );
    let points = chart.data().len();
    let chart_config = ChartConfig::new(chart).with_size(size.0, size.1);
    if extension.as_deref() == Some("png") {
        render_to(PlottersSurface::png(path, size), surface_id, chart_config, forecast)?;
    } else {
        render_to(PlottersSurface::svg(path, size), surface_id, chart_config, forecast)?;
    }

    info!(surface_id, output, points, "rendered chart");
    println!("Chart written to {output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::drawing_surface::{DrawCommand, RecordingSurface};
    use crate::test_support::{build_project, build_report, build_task, on_date};

    fn window() -> ChartWindow {
        ChartWindow {
            days: 30,
            weeks: 12,
            today: on_date(2026, 2, 20),
        }
    }

    #[test]
    fn productivity_panel_is_a_line_chart_per_reported_day() {
        let reports = vec![
            build_report("a", on_date(2026, 2, 16), "1", 5, 8.0, &["t1", "t2"]),
            build_report("b", on_date(2026, 2, 17), "1", 2, 5.0, &[]),
        ];
        let analytics = VisualAnalytics::new(&reports, &[], &[]);

        let (surface_id, chart) =
            dashboard_chart(&analytics, ChartSelection::Productivity, None, &window()).unwrap();

        assert_eq!(surface_id, PRODUCTIVITY_CHART_ID);
        assert!(matches!(chart, Chart::Line(_)));
        assert_eq!(chart.data().len(), 2);
        assert_eq!(chart.data()[0].value(), 5.0);
    }

    #[test]
    fn resource_panel_is_a_bar_per_iso_week() {
        let reports = vec![
            build_report("a", on_date(2026, 2, 9), "1", 5, 8.0, &[]),
            build_report("b", on_date(2026, 2, 16), "1", 2, 5.0, &[]),
        ];
        let analytics = VisualAnalytics::new(&reports, &[], &[]);

        let (surface_id, chart) =
            dashboard_chart(&analytics, ChartSelection::Resources, None, &window()).unwrap();

        assert_eq!(surface_id, RESOURCE_CHART_ID);
        assert!(matches!(chart, Chart::Bar(_)));
        assert_eq!(chart.data()[0].label(), "2026-W7");
        assert_eq!(chart.data()[1].value(), 10.0);
    }

    #[test]
    fn progress_panel_for_unknown_project_is_an_error() {
        let tasks = vec![build_task("t1", "1", "completed")];
        let projects = vec![build_project("1", "Harbor Tower")];
        let analytics = VisualAnalytics::new(&[], &tasks, &projects);

        let missing = RecordId::new("9");
        let error = dashboard_chart(
            &analytics,
            ChartSelection::Progress,
            Some(&missing),
            &window(),
        )
        .unwrap_err();
        assert!(matches!(error, CommandError::UnknownProject(id) if id == "9"));

        let known = RecordId::new("1");
        let (surface_id, chart) =
            dashboard_chart(&analytics, ChartSelection::Progress, Some(&known), &window())
                .unwrap();
        assert_eq!(surface_id, PROGRESS_CHART_ID);
        assert!(matches!(chart, Chart::Pie(_)));
    }

    fn bound_chart(chart: Chart) -> SimpleChart<RecordingSurface> {
        let mut surfaces = SurfaceSet::new();
        surfaces.insert(PRODUCTIVITY_CHART_ID, RecordingSurface::new(400, 300));
        SimpleChart::bind(&mut surfaces, PRODUCTIVITY_CHART_ID, ChartConfig::new(chart)).unwrap()
    }

    #[test]
    fn forecast_extends_line_charts_and_redraws() {
        let mut chart = bound_chart(Chart::line(
            vec![ChartPoint::from(2.0), ChartPoint::from(4.0), ChartPoint::from(6.0)],
            vec!["Feb 16".to_string(), "Feb 17".to_string(), "Feb 18".to_string()],
        ));

        extend_with_forecast(&mut chart, 2).unwrap();

        let Chart::Line(line) = chart.chart() else {
            panic!("expected a line chart");
        };
        let values: Vec<f64> = line.data.iter().map(ChartPoint::value).collect();
        assert_eq!(values.len(), 5);
        assert!((values[3] - 8.0).abs() < 1e-9);
        assert!((values[4] - 10.0).abs() < 1e-9);
        assert_eq!(line.labels[3], "Forecast +1d");
        assert_eq!(line.labels[4], "Forecast +2d");

        let drawn_labels: Vec<&str> = chart
            .surface()
            .unwrap()
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(drawn_labels.contains(&"Forecast +2d"));
    }

    #[test]
    fn forecast_leaves_bar_charts_and_short_lines_alone() {
        let bars = Chart::bar(vec![ChartPoint::from(1.0), ChartPoint::from(2.0)]);
        let mut chart = bound_chart(bars.clone());
        extend_with_forecast(&mut chart, 3).unwrap();
        assert_eq!(chart.chart(), &bars);

        let single = Chart::line(vec![ChartPoint::from(5.0)], vec!["Feb 16".to_string()]);
        let mut chart = bound_chart(single.clone());
        extend_with_forecast(&mut chart, 3).unwrap();
        assert_eq!(chart.chart(), &single);
    }
}
