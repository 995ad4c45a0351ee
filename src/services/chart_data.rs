use chrono::NaiveDate;

use crate::services::simple_chart::{Chart, ChartPoint};
use crate::services::visual_analytics::{DailyTrendPoint, ProgressSummary, WeeklyUtilization};

pub const PRODUCTIVITY_CHART_ID: &str = "productivityChart";
pub const SAFETY_CHART_ID: &str = "safetyChart";
pub const RESOURCE_CHART_ID: &str = "resourceChart";
pub const PROGRESS_CHART_ID: &str = "progressChart";

const RESOURCE_COLOR: &str = "#2563eb";
const COMPLETED_COLOR: &str = "#10b981";
const REMAINING_COLOR: &str = "#ef4444";

/// "Feb 16, 2026"
pub fn format_full_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// "Feb 16"
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

fn short_labels(points: &[DailyTrendPoint]) -> Vec<String> {
    points.iter().map(|point| format_short_date(point.date)).collect()
}

/// Tasks completed per 100 man-hours, one point per reported day.
pub fn productivity_chart(points: &[DailyTrendPoint]) -> Chart {
    let data = points
        .iter()
        .map(|point| {
            let value = if point.man_hours > 0.0 {
                point.tasks_completed as f64 / point.man_hours * 100.0
            } else {
                0.0
            };
            ChartPoint::dated(format_full_date(point.date), value)
        })
        .collect();
    Chart::line(data, short_labels(points))
}

pub fn safety_chart(points: &[DailyTrendPoint]) -> Chart {
    let data = points
        .iter()
        .map(|point| ChartPoint::dated(format_full_date(point.date), point.incidents as f64))
        .collect();
    Chart::line(data, short_labels(points))
}

pub fn resource_chart(weeks: &[WeeklyUtilization]) -> Chart {
    let data = weeks
        .iter()
        .map(|week| ChartPoint::labelled(week.week.clone(), week.man_hours, Some(RESOURCE_COLOR)))
        .collect();
    Chart::bar(data)
}

pub fn progress_chart(progress: &ProgressSummary) -> Chart {
    Chart::pie(vec![
        ChartPoint::labelled(
            "Completed",
            progress.completed_tasks as f64,
            Some(COMPLETED_COLOR),
        ),
        ChartPoint::labelled(
            "Remaining",
            progress.remaining_tasks() as f64,
            Some(REMAINING_COLOR),
        ),
    ])
}
