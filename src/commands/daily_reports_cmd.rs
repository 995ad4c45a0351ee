use chrono::Utc;

use crate::commands::base_commands::{ScopeArgs, StatusArg};
use crate::commands::command_context::{CommandError, TrackerData, parse_date, write_output};
use crate::domain::daily_report::DailyReport;
use crate::domain::record_id::RecordId;
use crate::services::app_config::AppConfig;
use crate::services::daily_report_store::{
    DailyReportStore, NewDailyReport, ReportFilter, ReportPatch,
};

/// Fields of a report filed from the command line.
pub struct ReportInput {
    pub date: Option<String>,
    pub project_name: Option<String>,
    pub workers: u32,
    pub hours: f64,
    pub crew_type: Option<String>,
    pub tasks: Vec<String>,
    pub weather: Option<String>,
    pub temperature: Option<f64>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// Fields of an existing report changed from the command line.
/// An empty task list keeps the stored tasks.
pub struct ReportChanges {
    pub date: Option<String>,
    pub workers: Option<u32>,
    pub hours: Option<f64>,
    pub tasks: Vec<String>,
    pub weather: Option<String>,
    pub notes: Option<String>,
    pub status: Option<StatusArg>,
}

impl ReportChanges {
    fn into_patch(self) -> Result<ReportPatch, CommandError> {
        Ok(ReportPatch {
            date: self
                .date
                .as_deref()
                .map(|date| parse_date(Some(date)))
                .transpose()?,
            workers: self.workers,
            hours_worked: self.hours,
            tasks_completed: (!self.tasks.is_empty()).then_some(self.tasks),
            weather_condition: self.weather,
            notes: self.notes,
            status: self.status.map(Into::into),
        })
    }
}

fn report_line(report: &DailyReport) -> String {
    format!(
        "{} | {} | {} | {} workers x {}h | {} tasks | {}",
        report.id,
        report.date,
        report.project_name.as_deref().unwrap_or("-"),
        report.workers(),
        report.hours_worked(),
        report.task_count(),
        report.status.as_str()
    )
}

pub fn list_reports_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    date: Option<&str>,
    status: Option<StatusArg>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let store = DailyReportStore::load(&data.storage)?;
    let filter = ReportFilter {
        date: date.map(|date| parse_date(Some(date))).transpose()?,
        project_id: config.project_id(scope.project.as_deref()),
        status: status.map(Into::into),
    };

    let reports = store.reports(&filter);
    if reports.is_empty() {
        println!("No daily reports found");
        return Ok(());
    }
    let lines: Vec<String> = reports.into_iter().map(report_line).collect();
    write_output(None, &lines.join("\n"))
}

pub fn add_report_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    input: ReportInput,
) -> Result<(), CommandError> {
    let mut data = TrackerData::load(config, scope)?;
    let mut store = DailyReportStore::load(&data.storage)?;
    let project_id = config.project_id(scope.project.as_deref());
    let project_name = input.project_name.or_else(|| {
        data.projects
            .iter()
            .find(|project| Some(&project.id) == project_id.as_ref())
            .map(|project| project.name.clone())
    });

    let new_report = NewDailyReport {
        date: input
            .date
            .as_deref()
            .map(|date| parse_date(Some(date)))
            .transpose()?,
        project_id,
        project_name,
        workers: input.workers,
        hours_worked: input.hours,
        crew_type: input.crew_type,
        tasks_completed: input.tasks,
        weather_condition: input.weather,
        temperature: input.temperature,
        weather_notes: None,
        notes: input.notes,
        created_by: input.created_by,
    };
    let id = store.create_report(new_report, Utc::now()).id.clone();
    store.save_to(&mut data.storage)?;
    data.storage.save()?;
    println!("Daily report {id} created");
    Ok(())
}

pub fn update_report_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    id: &str,
    changes: ReportChanges,
) -> Result<(), CommandError> {
    let patch = changes.into_patch()?;
    let mut data = TrackerData::load(config, scope)?;
    let mut store = DailyReportStore::load(&data.storage)?;
    let id = RecordId::new(id);
    let Some(report) = store.update_report(&id, patch, Utc::now()) else {
        return Err(CommandError::UnknownReport(id.to_string()));
    };
    let line = report_line(report);
    store.save_to(&mut data.storage)?;
    data.storage.save()?;
    println!("Daily report updated: {line}");
    Ok(())
}

pub fn approve_report_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    id: &str,
    approved_by: &str,
) -> Result<(), CommandError> {
    let mut data = TrackerData::load(config, scope)?;
    let mut store = DailyReportStore::load(&data.storage)?;
    let id = RecordId::new(id);
    if store.approve_report(&id, approved_by, Utc::now()).is_none() {
        return Err(CommandError::UnknownReport(id.to_string()));
    }
    store.save_to(&mut data.storage)?;
    data.storage.save()?;
    println!("Daily report {id} approved by {approved_by}");
    Ok(())
}

pub fn export_reports_command(
    config: &AppConfig,
    scope: &ScopeArgs,
    output: Option<&str>,
) -> Result<(), CommandError> {
    let data = TrackerData::load(config, scope)?;
    let store = DailyReportStore::load(&data.storage)?;
    let csv = store.export_csv()?;
    write_output(output, &csv)?;
    if let Some(path) = output {
        println!("Daily reports exported to {path}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::daily_report::ReportStatus;
    use crate::test_support::{build_report, on_date};

    #[test]
    fn report_line_shows_crew_and_status() {
        let report = build_report("17", on_date(2026, 2, 16), "1", 5, 8.0, &["t1", "t2"]);
        assert_eq!(
            report_line(&report),
            "17 | 2026-02-16 | Project 1 | 5 workers x 8h | 2 tasks | draft"
        );
    }

    #[test]
    fn report_changes_keep_tasks_when_none_are_given() {
        let patch = ReportChanges {
            date: Some("2026-02-18".to_string()),
            workers: Some(3),
            hours: None,
            tasks: Vec::new(),
            weather: None,
            notes: None,
            status: Some(StatusArg::Submitted),
        }
        .into_patch()
        .unwrap();

        assert_eq!(patch.date, Some(on_date(2026, 2, 18)));
        assert_eq!(patch.workers, Some(3));
        assert_eq!(patch.tasks_completed, None);
        assert_eq!(patch.status, Some(ReportStatus::Submitted));
    }

    #[test]
    fn report_changes_reject_malformed_dates() {
        let changes = ReportChanges {
            date: Some("18.02.2026".to_string()),
            workers: None,
            hours: None,
            tasks: vec!["Pour slab".to_string()],
            weather: None,
            notes: None,
            status: None,
        };
        assert!(matches!(
            changes.into_patch(),
            Err(CommandError::InvalidDate(_))
        ));
    }
}
