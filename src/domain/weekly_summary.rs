use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::record_id::RecordId;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProductivityMetrics {
    pub total_man_hours: f64,
    pub tasks_completed: usize,
    pub productivity_rate: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SafetyMetrics {
    pub incidents: usize,
    pub incident_rate: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct QualityMetrics {
    pub defects_found: usize,
    pub quality_score: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeeklyMetrics {
    pub productivity: ProductivityMetrics,
    pub safety: SafetyMetrics,
    pub quality: QualityMetrics,
}

impl Default for WeeklyMetrics {
    fn default() -> Self {
        Self {
            productivity: ProductivityMetrics {
                total_man_hours: 0.0,
                tasks_completed: 0,
                productivity_rate: 0.0,
            },
            safety: SafetyMetrics {
                incidents: 0,
                incident_rate: 0.0,
            },
            quality: QualityMetrics {
                defects_found: 0,
                quality_score: 100.0,
            },
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Positive,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Highlight {
    pub kind: HighlightKind,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub priority: Priority,
    pub message: String,
}

/// Aggregate of the daily reports filed in one Monday-start week.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeeklySummary {
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
    pub project_id: Option<RecordId>,
    pub total_reports: usize,
    pub total_days_reported: usize,
    pub metrics: WeeklyMetrics,
    pub highlights: Vec<Highlight>,
    pub recommendations: Vec<Recommendation>,
}

/// Direction of a week-over-week metric change.
///
/// `Worsening` is only produced when the previous value was exactly 0 and
/// the current value moved the wrong way: up for a lower-is-better metric,
/// below zero for a higher-is-better one. Every other negative change is
/// `Declining`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    Worsening,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
            Trend::Worsening => "worsening",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeeklyTrends {
    pub productivity: Trend,
    pub safety: Trend,
    pub quality: Trend,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TrendComparison {
    pub current: WeeklySummary,
    pub previous: WeeklySummary,
    pub trends: WeeklyTrends,
}
