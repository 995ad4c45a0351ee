use csv::QuoteStyle;

use crate::domain::weekly_summary::{HighlightKind, TrendComparison, WeeklySummary, WeeklyTrends};
use crate::services::chart_data::format_full_date;
use crate::services::csv_export::{CsvExportError, rows_to_csv};

/// Highlights shown on a weekly card; the detail report lists all of them.
pub const CARD_HIGHLIGHT_LIMIT: usize = 3;
const NO_HIGHLIGHTS: &str = "No significant highlights this week";
const NO_RECOMMENDATIONS: &str = "No specific recommendations at this time";

fn week_range(summary: &WeeklySummary) -> String {
    format!(
        "{} - {}",
        format_full_date(summary.week_start_date),
        format_full_date(summary.week_end_date)
    )
}

fn highlight_line(kind: HighlightKind, message: &str) -> String {
    match kind {
        HighlightKind::Positive => format!("  + {message}"),
    }
}

pub fn format_weekly_card(summary: &WeeklySummary, trends: &WeeklyTrends) -> String {
    let metrics = &summary.metrics;
    let mut lines = Vec::new();
    lines.push(format!(
        "Week of {}",
        format_full_date(summary.week_start_date)
    ));
    lines.push(format!(
        "{} | {} daily reports",
        week_range(summary),
        summary.total_reports
    ));
    lines.push(format!(
        "Man-hours: {} | Tasks completed: {} | Days reported: {}/7",
        metrics.productivity.total_man_hours,
        metrics.productivity.tasks_completed,
        summary.total_days_reported
    ));
    lines.push(format!(
        "Tasks/man-hour: {} ({})",
        metrics.productivity.productivity_rate,
        trends.productivity.as_str()
    ));
    lines.push(format!(
        "Safety incidents: {} ({})",
        metrics.safety.incidents,
        trends.safety.as_str()
    ));
    lines.push(format!(
        "Quality score: {}% ({})",
        metrics.quality.quality_score,
        trends.quality.as_str()
    ));
    lines.push("Highlights:".to_string());
    if summary.highlights.is_empty() {
        lines.push(format!("  {NO_HIGHLIGHTS}"));
    }
    for highlight in summary.highlights.iter().take(CARD_HIGHLIGHT_LIMIT) {
        lines.push(highlight_line(highlight.kind, &highlight.message));
    }

    lines.join("\n")
}

pub fn format_weekly_detail(comparison: &TrendComparison, project_name: &str) -> String {
    let current = &comparison.current;
    let previous = &comparison.previous;
    let trends = &comparison.trends;

    let mut lines = Vec::new();
    lines.push("Weekly Intelligence Report".to_string());
    lines.push(format!(
        "Week of {}",
        format_full_date(current.week_start_date)
    ));
    lines.push(week_range(current));
    lines.push(format!("Project: {project_name}"));
    lines.push(format!(
        "Daily Reports: {} ({}/7 days)",
        current.total_reports, current.total_days_reported
    ));
    lines.push(String::new());
    lines.push("Week-over-Week Comparison".to_string());
    lines.push("Metric | Current | Previous | Trend".to_string());
    lines.push("-------|---------|----------|------".to_string());
    lines.push(format!(
        "Productivity | {} | {} | {}",
        current.metrics.productivity.productivity_rate,
        previous.metrics.productivity.productivity_rate,
        trends.productivity.as_str()
    ));
    lines.push(format!(
        "Safety | {} | {} | {}",
        current.metrics.safety.incidents,
        previous.metrics.safety.incidents,
        trends.safety.as_str()
    ));
    lines.push(format!(
        "Quality | {}% | {}% | {}",
        current.metrics.quality.quality_score,
        previous.metrics.quality.quality_score,
        trends.quality.as_str()
    ));
    lines.push(String::new());
    lines.push("Detailed Metrics".to_string());
    lines.push(format!(
        "Total Man-hours: {}",
        current.metrics.productivity.total_man_hours
    ));
    lines.push(format!(
        "Tasks Completed: {}",
        current.metrics.productivity.tasks_completed
    ));
    lines.push(format!(
        "Productivity Rate: {} tasks/man-hour",
        current.metrics.productivity.productivity_rate
    ));
    lines.push(format!("Incidents: {}", current.metrics.safety.incidents));
    lines.push(format!(
        "Incident Rate: {} per 200K hours",
        current.metrics.safety.incident_rate
    ));
    lines.push(format!(
        "Defects Found: {}",
        current.metrics.quality.defects_found
    ));
    lines.push(format!(
        "Quality Score: {}%",
        current.metrics.quality.quality_score
    ));
    lines.push(String::new());
    lines.push("Key Highlights".to_string());
    if current.highlights.is_empty() {
        lines.push(format!("  {NO_HIGHLIGHTS}"));
    }
    for highlight in &current.highlights {
        lines.push(highlight_line(highlight.kind, &highlight.message));
    }
    lines.push(String::new());
    lines.push("Recommendations".to_string());
    if current.recommendations.is_empty() {
        lines.push(format!("  {NO_RECOMMENDATIONS}"));
    }
    for recommendation in &current.recommendations {
        lines.push(format!(
            "  {}: {}",
            recommendation.priority.label(),
            recommendation.message
        ));
    }

    lines.join("\n")
}

/// Text export of one week; the metric block is comma separated.
pub fn format_weekly_export(
    summary: &WeeklySummary,
    project_name: &str,
) -> Result<String, CsvExportError> {
    let metrics = &summary.metrics;
    let metric_rows = vec![
        vec![
            "Total Man-hours".to_string(),
            metrics.productivity.total_man_hours.to_string(),
        ],
        vec![
            "Tasks Completed".to_string(),
            metrics.productivity.tasks_completed.to_string(),
        ],
        vec![
            "Productivity Rate".to_string(),
            format!("{} tasks/man-hour", metrics.productivity.productivity_rate),
        ],
        vec![
            "Safety Incidents".to_string(),
            metrics.safety.incidents.to_string(),
        ],
        vec![
            "Incident Rate".to_string(),
            format!("{} per 200K hours", metrics.safety.incident_rate),
        ],
        vec![
            "Quality Score".to_string(),
            format!("{}%", metrics.quality.quality_score),
        ],
        vec![
            "Defects Found".to_string(),
            metrics.quality.defects_found.to_string(),
        ],
    ];
    let metric_block = rows_to_csv(metric_rows, QuoteStyle::Necessary)?;

    let mut lines = Vec::new();
    lines.push("Weekly Intelligence Report".to_string());
    lines.push(format!("Week: {}", week_range(summary)));
    lines.push(format!("Project: {project_name}"));
    lines.push(format!(
        "Daily Reports: {} ({}/7 days)",
        summary.total_reports, summary.total_days_reported
    ));
    lines.push(String::new());
    lines.push("Summary Metrics:".to_string());
    lines.push(metric_block.trim_end().to_string());
    lines.push(String::new());
    lines.push("Highlights:".to_string());
    lines.extend(summary.highlights.iter().map(|h| h.message.clone()));
    lines.push(String::new());
    lines.push("Recommendations:".to_string());
    lines.extend(
        summary
            .recommendations
            .iter()
            .map(|r| format!("{}: {}", r.priority.label(), r.message)),
    );

    Ok(lines.join("\n"))
}

/// `weekly_report_20260216.csv` for the week starting 2026-02-16.
pub fn weekly_export_file_name(summary: &WeeklySummary) -> String {
    format!(
        "weekly_report_{}.csv",
        summary.week_start_date.format("%Y%m%d")
    )
}
