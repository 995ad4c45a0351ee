use chrono::NaiveDate;

use crate::domain::daily_report::{CrewDetails, DailyReport, ReportStatus, Weather};
use crate::domain::project::Project;
use crate::domain::record_id::RecordId;
use crate::domain::task::Task;

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn build_report(
    id: &str,
    date: NaiveDate,
    project_id: &str,
    workers: u32,
    hours_worked: f64,
    tasks: &[&str],
) -> DailyReport {
    DailyReport {
        id: RecordId::new(id),
        date,
        project_id: Some(RecordId::new(project_id)),
        project_name: Some(format!("Project {project_id}")),
        crew_details: CrewDetails {
            workers: Some(workers),
            hours_worked: Some(hours_worked),
            crew_type: Some("general".to_string()),
        },
        tasks_completed: Some(tasks.iter().map(|task| task.to_string()).collect()),
        weather: Weather {
            condition: Some("sunny".to_string()),
            temperature: Some(20.0),
            notes: None,
        },
        notes: None,
        status: ReportStatus::Draft,
        created_at: None,
        created_by: None,
        updated_at: None,
        approved_by: None,
        approved_at: None,
    }
}

pub fn build_report_with_notes(
    id: &str,
    date: NaiveDate,
    project_id: &str,
    workers: u32,
    hours_worked: f64,
    tasks: &[&str],
    notes: &str,
) -> DailyReport {
    let mut report = build_report(id, date, project_id, workers, hours_worked, tasks);
    report.notes = Some(notes.to_string());
    report
}

pub fn build_task(id: &str, project_id: &str, status: &str) -> Task {
    Task {
        id: RecordId::new(id),
        project_id: Some(RecordId::new(project_id)),
        name: Some(format!("Task {id}")),
        description: None,
        due_date: None,
        priority: Some("medium".to_string()),
        status: Some(status.to_string()),
        assignee: None,
        dependencies: Vec::new(),
    }
}

pub fn build_project(id: &str, name: &str) -> Project {
    Project {
        id: RecordId::new(id),
        name: name.to_string(),
        description: None,
        start_date: None,
        end_date: None,
        status: Some("active".to_string()),
        progress: None,
    }
}
