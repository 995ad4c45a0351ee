use chrono::{DateTime, NaiveDate, Utc};
use csv::QuoteStyle;
use tracing::info;

use crate::domain::daily_report::{CrewDetails, DailyReport, ReportStatus, Weather};
use crate::domain::record_id::RecordId;
use crate::services::csv_export::{CsvExportError, rows_to_csv};
use crate::services::storage::{DAILY_REPORTS_KEY, Storage, StorageError};

const CSV_HEADERS: [&str; 8] = [
    "Date",
    "Project",
    "Workers",
    "Hours Worked",
    "Tasks Completed",
    "Weather",
    "Status",
    "Notes",
];
pub const DEFAULT_AUTHOR: &str = "admin";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDailyReport {
    pub date: Option<NaiveDate>,
    pub project_id: Option<RecordId>,
    pub project_name: Option<String>,
    pub workers: u32,
    pub hours_worked: f64,
    pub crew_type: Option<String>,
    pub tasks_completed: Vec<String>,
    pub weather_condition: Option<String>,
    pub temperature: Option<f64>,
    pub weather_notes: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// Fields to overwrite on an existing report; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPatch {
    pub date: Option<NaiveDate>,
    pub workers: Option<u32>,
    pub hours_worked: Option<f64>,
    pub tasks_completed: Option<Vec<String>>,
    pub weather_condition: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub date: Option<NaiveDate>,
    pub project_id: Option<RecordId>,
    pub status: Option<ReportStatus>,
}

/// The `dailyReports` collection, loaded whole and written back whole.
#[derive(Debug, Clone, Default)]
pub struct DailyReportStore {
    reports: Vec<DailyReport>,
}

impl DailyReportStore {
    pub fn load(storage: &Storage) -> Result<Self, StorageError> {
        Ok(Self {
            reports: storage.collection(DAILY_REPORTS_KEY)?,
        })
    }

    pub fn save_to(&self, storage: &mut Storage) -> Result<(), StorageError> {
        storage.replace_collection(DAILY_REPORTS_KEY, &self.reports)
    }

    /// Adds a draft report whose id is the creation time in milliseconds.
    /// A report without a date is filed for the day it was created.
    pub fn create_report(&mut self, new_report: NewDailyReport, now: DateTime<Utc>) -> &DailyReport {
        let mut id = now.timestamp_millis();
        while self.find_index(&RecordId::new(id.to_string())).is_some() {
            id += 1;
        }

        let report = DailyReport {
            id: RecordId::new(id.to_string()),
            date: new_report.date.unwrap_or_else(|| now.date_naive()),
            project_id: new_report.project_id,
            project_name: new_report.project_name,
            crew_details: CrewDetails {
                workers: Some(new_report.workers),
                hours_worked: Some(new_report.hours_worked),
                crew_type: new_report.crew_type,
            },
            tasks_completed: Some(new_report.tasks_completed),
            weather: Weather {
                condition: new_report.weather_condition,
                temperature: new_report.temperature,
                notes: new_report.weather_notes,
            },
            notes: new_report.notes,
            status: ReportStatus::Draft,
            created_at: Some(now),
            created_by: Some(
                new_report
                    .created_by
                    .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            ),
            updated_at: None,
            approved_by: None,
            approved_at: None,
        };
        info!(id = %report.id, date = %report.date, "created daily report");
        self.reports.push(report);
        &self.reports[self.reports.len() - 1]
    }

    pub fn update_report(
        &mut self,
        id: &RecordId,
        patch: ReportPatch,
        now: DateTime<Utc>,
    ) -> Option<&DailyReport> {
        let index = self.find_index(id)?;
        let report = &mut self.reports[index];
        if let Some(date) = patch.date {
            report.date = date;
        }
        if let Some(workers) = patch.workers {
            report.crew_details.workers = Some(workers);
        }
        if let Some(hours_worked) = patch.hours_worked {
            report.crew_details.hours_worked = Some(hours_worked);
        }
        if let Some(tasks) = patch.tasks_completed {
            report.tasks_completed = Some(tasks);
        }
        if let Some(condition) = patch.weather_condition {
            report.weather.condition = Some(condition);
        }
        if let Some(notes) = patch.notes {
            report.notes = Some(notes);
        }
        if let Some(status) = patch.status {
            report.status = status;
        }
        report.updated_at = Some(now);
        Some(&*report)
    }

    pub fn approve_report(
        &mut self,
        id: &RecordId,
        approved_by: &str,
        now: DateTime<Utc>,
    ) -> Option<&DailyReport> {
        let index = self.find_index(id)?;
        let report = &mut self.reports[index];
        report.status = ReportStatus::Approved;
        report.approved_by = Some(approved_by.to_string());
        report.approved_at = Some(now);
        info!(id = %report.id, approved_by, "approved daily report");
        Some(&*report)
    }

    /// Matching reports, newest date first.
    pub fn reports(&self, filter: &ReportFilter) -> Vec<&DailyReport> {
        let mut reports: Vec<&DailyReport> = self
            .reports
            .iter()
            .filter(|report| filter.date.is_none_or(|date| report.date == date))
            .filter(|report| report.belongs_to(filter.project_id.as_ref()))
            .filter(|report| filter.status.is_none_or(|status| report.status == status))
            .collect();
        reports.sort_by(|a, b| b.date.cmp(&a.date));
        reports
    }

    pub fn export_csv(&self) -> Result<String, CsvExportError> {
        let header: Vec<String> = CSV_HEADERS.iter().map(|header| header.to_string()).collect();
        let rows = self.reports.iter().map(|report| {
            vec![
                report.date.to_string(),
                report.project_name.clone().unwrap_or_default(),
                report.workers().to_string(),
                report.hours_worked().to_string(),
                report.tasks_completed.clone().unwrap_or_default().join("; "),
                report.weather.condition.clone().unwrap_or_default(),
                report.status.as_str().to_string(),
                report.notes().to_string(),
            ]
        });
        rows_to_csv(std::iter::once(header).chain(rows), QuoteStyle::Always)
    }

    fn find_index(&self, id: &RecordId) -> Option<usize> {
        self.reports.iter().position(|report| &report.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_report, on_date};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 18, hour, 0, 0).unwrap()
    }

    fn store_with(reports: Vec<DailyReport>) -> DailyReportStore {
        DailyReportStore { reports }
    }

    #[test]
    fn create_report_assigns_timestamp_id_and_draft_status() {
        let mut store = DailyReportStore::default();
        let created = store
            .create_report(
                NewDailyReport {
                    project_id: Some(RecordId::new("3")),
                    workers: 4,
                    hours_worked: 8.0,
                    tasks_completed: vec!["frame wall".to_string()],
                    ..NewDailyReport::default()
                },
                at(17),
            )
            .clone();

        assert_eq!(created.id.as_str(), at(17).timestamp_millis().to_string());
        assert_eq!(created.date, on_date(2026, 2, 18));
        assert_eq!(created.status, ReportStatus::Draft);
        assert_eq!(created.created_by.as_deref(), Some(DEFAULT_AUTHOR));
        assert_eq!(created.man_hours(), 32.0);
    }

    #[test]
    fn ids_created_in_the_same_millisecond_do_not_collide() {
        let mut store = DailyReportStore::default();
        let first = store.create_report(NewDailyReport::default(), at(9)).id.clone();
        let second = store.create_report(NewDailyReport::default(), at(9)).id.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn update_report_merges_patch_and_stamps_time() {
        let mut store = store_with(vec![build_report("1", on_date(2026, 2, 16), "1", 2, 4.0, &[])]);

        let updated = store
            .update_report(
                &RecordId::new("1"),
                ReportPatch {
                    workers: Some(5),
                    notes: Some("crane inspection".to_string()),
                    ..ReportPatch::default()
                },
                at(12),
            )
            .unwrap();

        assert_eq!(updated.workers(), 5);
        assert_eq!(updated.hours_worked(), 4.0);
        assert_eq!(updated.notes(), "crane inspection");
        assert_eq!(updated.updated_at, Some(at(12)));
        assert!(store
            .update_report(&RecordId::new("404"), ReportPatch::default(), at(12))
            .is_none());
    }

    #[test]
    fn approve_report_records_approver() {
        let mut store = store_with(vec![build_report("1", on_date(2026, 2, 16), "1", 2, 4.0, &[])]);

        let approved = store
            .approve_report(&RecordId::new("1"), "site lead", at(18))
            .unwrap();

        assert_eq!(approved.status, ReportStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("site lead"));
        assert_eq!(approved.approved_at, Some(at(18)));
        assert!(store.approve_report(&RecordId::new("2"), "x", at(18)).is_none());
    }

    #[test]
    fn reports_filter_and_sort_newest_first() {
        let mut approved = build_report("3", on_date(2026, 2, 17), "1", 1, 1.0, &[]);
        approved.status = ReportStatus::Approved;
        let store = store_with(vec![
            build_report("1", on_date(2026, 2, 16), "1", 1, 1.0, &[]),
            build_report("2", on_date(2026, 2, 18), "2", 1, 1.0, &[]),
            approved,
        ]);

        let all: Vec<&str> = store
            .reports(&ReportFilter::default())
            .iter()
            .map(|report| report.id.as_str())
            .collect();
        assert_eq!(all, vec!["2", "3", "1"]);

        let drafts_of_one = store.reports(&ReportFilter {
            project_id: Some(RecordId::new("1")),
            status: Some(ReportStatus::Draft),
            ..ReportFilter::default()
        });
        assert_eq!(drafts_of_one.len(), 1);
        assert_eq!(drafts_of_one[0].id.as_str(), "1");

        let on_day = store.reports(&ReportFilter {
            date: Some(on_date(2026, 2, 18)),
            ..ReportFilter::default()
        });
        assert_eq!(on_day.len(), 1);
    }

    #[test]
    fn export_csv_quotes_every_field() {
        let mut report = build_report("1", on_date(2026, 2, 16), "1", 5, 8.0, &["t1", "t2"]);
        report.notes = Some("said \"ok\"".to_string());
        let store = store_with(vec![report]);

        let csv = store.export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "\"Date\",\"Project\",\"Workers\",\"Hours Worked\",\"Tasks Completed\",\"Weather\",\"Status\",\"Notes\""
        );
        assert_eq!(
            lines[1],
            "\"2026-02-16\",\"Project 1\",\"5\",\"8\",\"t1; t2\",\"sunny\",\"draft\",\"said \"\"ok\"\"\""
        );
    }

    #[test]
    fn load_and_save_round_trip_through_storage() {
        let mut storage = Storage::in_memory();
        let mut store = DailyReportStore::load(&storage).unwrap();
        store.create_report(NewDailyReport::default(), at(8));
        store.save_to(&mut storage).unwrap();

        let reloaded = DailyReportStore::load(&storage).unwrap();
        assert_eq!(reloaded.reports(&ReportFilter::default()).len(), 1);
    }
}
