use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::daily_report::DailyReport;
use crate::domain::record_id::RecordId;
use crate::domain::weekly_summary::{
    Highlight, HighlightKind, Priority, ProductivityMetrics, QualityMetrics, Recommendation,
    SafetyMetrics, Trend, TrendComparison, WeeklyMetrics, WeeklySummary, WeeklyTrends,
};
use crate::services::week_calendar::{previous_week_start, week_end_of};

/// Incidents per 100 full-time workers per year (2000 h × 100).
pub const INCIDENT_RATE_BASE_HOURS: f64 = 200_000.0;
pub const EXCELLENT_QUALITY_THRESHOLD: f64 = 95.0;
pub const LOW_PRODUCTIVITY_THRESHOLD: f64 = 0.3;
/// Percent changes smaller than this are reported as stable.
pub const STABLE_CHANGE_PERCENT: f64 = 5.0;

pub const ZERO_INCIDENTS_MESSAGE: &str = "Zero safety incidents this week";
pub const CREW_ALLOCATION_MESSAGE: &str = "Consider reviewing crew allocation and task assignments";

/// Aggregates a snapshot of daily reports into weekly summaries.
pub struct WeeklyAnalytics<'a> {
    reports: &'a [DailyReport],
}

#[derive(Default)]
struct WeeklyTotals {
    man_hours: f64,
    tasks_completed: usize,
    workers: u64,
    incidents: usize,
    defects: usize,
}

impl<'a> WeeklyAnalytics<'a> {
    pub fn new(reports: &'a [DailyReport]) -> Self {
        Self { reports }
    }

    /// Reports dated within `[week_start, week_start + 6 days]`.
    pub fn get_weekly_daily_reports(
        &self,
        week_start: NaiveDate,
        project_id: Option<&RecordId>,
    ) -> Vec<&'a DailyReport> {
        let week_end = week_end_of(week_start);
        self.reports
            .iter()
            .filter(|report| report.date >= week_start && report.date <= week_end)
            .filter(|report| report.belongs_to(project_id))
            .collect()
    }

    pub fn generate_weekly_from_daily(
        &self,
        week_start: NaiveDate,
        project_id: Option<&RecordId>,
    ) -> WeeklySummary {
        let reports = self.get_weekly_daily_reports(week_start, project_id);
        let mut summary = WeeklySummary {
            week_start_date: week_start,
            week_end_date: week_end_of(week_start),
            project_id: project_id.cloned(),
            total_reports: reports.len(),
            total_days_reported: 0,
            metrics: WeeklyMetrics::default(),
            highlights: Vec::new(),
            recommendations: Vec::new(),
        };
        if reports.is_empty() {
            return summary;
        }

        let totals = reports.iter().fold(WeeklyTotals::default(), |mut totals, report| {
            totals.man_hours += report.man_hours();
            totals.tasks_completed += report.task_count();
            totals.workers += u64::from(report.workers());
            if report.mentions_incident() {
                totals.incidents += 1;
            }
            if report.mentions_defect() {
                totals.defects += 1;
            }
            totals
        });
        debug!(
            week = %week_start,
            reports = reports.len(),
            man_hours = totals.man_hours,
            workers = totals.workers,
            "aggregated weekly totals"
        );

        let productivity_rate = if totals.man_hours > 0.0 {
            round_to(totals.tasks_completed as f64 / totals.man_hours, 2)
        } else {
            0.0
        };
        let incident_rate = if totals.man_hours > 0.0 {
            round_to(
                totals.incidents as f64 / totals.man_hours * INCIDENT_RATE_BASE_HOURS,
                2,
            )
        } else {
            0.0
        };
        let quality_score = if totals.tasks_completed > 0 {
            round_to(
                100.0 - totals.defects as f64 / totals.tasks_completed as f64 * 100.0,
                1,
            )
        } else {
            100.0
        };

        summary.total_days_reported = reports
            .iter()
            .map(|report| report.date)
            .collect::<BTreeSet<_>>()
            .len();
        summary.metrics = WeeklyMetrics {
            productivity: ProductivityMetrics {
                total_man_hours: totals.man_hours,
                tasks_completed: totals.tasks_completed,
                productivity_rate,
            },
            safety: SafetyMetrics {
                incidents: totals.incidents,
                incident_rate,
            },
            quality: QualityMetrics {
                defects_found: totals.defects,
                quality_score,
            },
        };
        summary.highlights = highlights_for(&summary.metrics);
        summary.recommendations = recommendations_for(&summary.metrics);
        summary
    }

    /// Compares the requested week with the week exactly 7 days earlier.
    pub fn get_weekly_trends(
        &self,
        week_start: NaiveDate,
        project_id: Option<&RecordId>,
    ) -> TrendComparison {
        let current = self.generate_weekly_from_daily(week_start, project_id);
        let previous =
            self.generate_weekly_from_daily(previous_week_start(week_start), project_id);

        let trends = WeeklyTrends {
            productivity: calculate_trend(
                previous.metrics.productivity.productivity_rate,
                current.metrics.productivity.productivity_rate,
                false,
            ),
            safety: calculate_trend(
                previous.metrics.safety.incidents as f64,
                current.metrics.safety.incidents as f64,
                true,
            ),
            quality: calculate_trend(
                previous.metrics.quality.quality_score,
                current.metrics.quality.quality_score,
                false,
            ),
        };

        TrendComparison {
            current,
            previous,
            trends,
        }
    }
}

fn highlights_for(metrics: &WeeklyMetrics) -> Vec<Highlight> {
    let mut highlights = Vec::new();
    if metrics.safety.incidents == 0 {
        highlights.push(Highlight {
            kind: HighlightKind::Positive,
            message: ZERO_INCIDENTS_MESSAGE.to_string(),
        });
    }
    if metrics.quality.quality_score > EXCELLENT_QUALITY_THRESHOLD {
        // Without completed tasks the score is the flat default, shown whole.
        let score = if metrics.productivity.tasks_completed > 0 {
            format!("{:.1}", metrics.quality.quality_score)
        } else {
            format!("{}", metrics.quality.quality_score)
        };
        highlights.push(Highlight {
            kind: HighlightKind::Positive,
            message: format!("Excellent quality score: {score}%"),
        });
    }
    highlights
}

fn recommendations_for(metrics: &WeeklyMetrics) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    if metrics.productivity.productivity_rate < LOW_PRODUCTIVITY_THRESHOLD {
        recommendations.push(Recommendation {
            priority: Priority::High,
            message: CREW_ALLOCATION_MESSAGE.to_string(),
        });
    }
    recommendations
}

/// Classifies the change from `previous` to `current`.
///
/// A jump from zero cannot be expressed as a percentage, so it is labelled
/// directly: a move from zero in the unwanted direction is `Worsening`.
pub fn calculate_trend(previous: f64, current: f64, lower_is_better: bool) -> Trend {
    if previous == 0.0 && current == 0.0 {
        return Trend::Stable;
    }
    if previous == 0.0 {
        let rose = current > 0.0;
        return if rose != lower_is_better {
            Trend::Improving
        } else {
            Trend::Worsening
        };
    }

    let change = (current - previous) / previous * 100.0;
    if change.abs() < STABLE_CHANGE_PERCENT {
        return Trend::Stable;
    }

    let improving = if lower_is_better {
        change < 0.0
    } else {
        change > 0.0
    };
    if improving {
        Trend::Improving
    } else {
        Trend::Declining
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
