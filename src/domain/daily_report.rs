use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::record_id::RecordId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Submitted => "submitted",
            ReportStatus::Approved => "approved",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewDetails {
    #[serde(default)]
    pub workers: Option<u32>,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    #[serde(default)]
    pub crew_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One crew's end-of-day report for a project site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub id: RecordId,
    pub date: NaiveDate,
    #[serde(default)]
    pub project_id: Option<RecordId>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub crew_details: CrewDetails,
    #[serde(default)]
    pub tasks_completed: Option<Vec<String>>,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl DailyReport {
    pub fn workers(&self) -> u32 {
        self.crew_details.workers.unwrap_or(0)
    }

    pub fn hours_worked(&self) -> f64 {
        self.crew_details.hours_worked.unwrap_or(0.0)
    }

    pub fn man_hours(&self) -> f64 {
        f64::from(self.workers()) * self.hours_worked()
    }

    pub fn task_count(&self) -> usize {
        self.tasks_completed.as_ref().map_or(0, Vec::len)
    }

    pub fn notes(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    /// Any mention of "incident" counts, including "no incident occurred".
    pub fn mentions_incident(&self) -> bool {
        self.notes().to_lowercase().contains("incident")
    }

    pub fn mentions_defect(&self) -> bool {
        let notes = self.notes().to_lowercase();
        notes.contains("defect") || notes.contains("rework")
    }

    /// `None` matches every project.
    pub fn belongs_to(&self, project_id: Option<&RecordId>) -> bool {
        match project_id {
            Some(wanted) => self.project_id.as_ref() == Some(wanted),
            None => true,
        }
    }
}
