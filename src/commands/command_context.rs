use std::io;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::commands::base_commands::ScopeArgs;
use crate::domain::daily_report::DailyReport;
use crate::domain::project::Project;
use crate::domain::record_id::RecordId;
use crate::domain::task::Task;
use crate::services::app_config::{AppConfig, ConfigError};
use crate::services::csv_export::CsvExportError;
use crate::services::drawing_surface::SurfaceError;
use crate::services::storage::{DAILY_REPORTS_KEY, PROJECTS_KEY, Storage, StorageError, TASKS_KEY};
use crate::services::visual_analytics::ALL_PROJECTS;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write output file {path}: {source}")]
    WriteOutput { path: String, source: io::Error },
    #[error(transparent)]
    Csv(#[from] CsvExportError),
    #[error("failed to render chart: {0}")]
    Chart(#[from] SurfaceError),
    #[error("unknown project `{0}`")]
    UnknownProject(String),
    #[error("no daily report with id `{0}`")]
    UnknownReport(String),
    #[error("unsupported chart file `{0}`, expected a .png or .svg path")]
    UnsupportedChartFormat(String),
}

/// The collections the analytics commands read, loaded from one storage file.
pub struct TrackerData {
    pub storage: Storage,
    pub reports: Vec<DailyReport>,
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
}

impl TrackerData {
    pub fn load(config: &AppConfig, scope: &ScopeArgs) -> Result<Self, CommandError> {
        let path = config.storage_path(scope.storage.as_deref())?;
        let storage = Storage::open(&path)?;
        let reports: Vec<DailyReport> = storage.collection(DAILY_REPORTS_KEY)?;
        let tasks: Vec<Task> = storage.collection(TASKS_KEY)?;
        let projects: Vec<Project> = storage.collection(PROJECTS_KEY)?;
        info!(
            path = %path,
            reports = reports.len(),
            tasks = tasks.len(),
            projects = projects.len(),
            "loaded tracker data"
        );
        Ok(Self {
            storage,
            reports,
            tasks,
            projects,
        })
    }

    /// Name of the project, or "All Projects" when unfiltered or unknown.
    pub fn project_name(&self, project_id: Option<&RecordId>) -> String {
        project_id
            .and_then(|id| self.projects.iter().find(|project| &project.id == id))
            .map(|project| project.name.clone())
            .unwrap_or_else(|| ALL_PROJECTS.to_string())
    }
}

/// Parses `YYYY-MM-DD`; no value means today.
pub fn parse_date(value: Option<&str>) -> Result<NaiveDate, CommandError> {
    match value {
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| CommandError::InvalidDate(text.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

/// Writes `contents` to the file at `output`, or to stdout.
pub fn write_output(output: Option<&str>, contents: &str) -> Result<(), CommandError> {
    match output {
        Some(path) => std::fs::write(path, contents).map_err(|source| CommandError::WriteOutput {
            path: path.to_string(),
            source,
        }),
        None => {
            if contents.ends_with('\n') {
                print!("{contents}");
            } else {
                println!("{contents}");
            }
            Ok(())
        }
    }
}

pub fn write_yaml<T: Serialize>(
    output: Option<&str>,
    value: &T,
    description: &str,
) -> Result<(), CommandError> {
    let yaml = serde_yaml::to_string(value)?;
    write_output(output, &yaml)?;
    if let Some(path) = output {
        println!("{description} written to {path}");
    }
    Ok(())
}
