use std::env;
use std::io;
use std::ops::RangeInclusive;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::record_id::RecordId;
use crate::services::simple_chart::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::services::visual_analytics::{
    DEFAULT_FORECAST_PERIODS, DEFAULT_TREND_DAYS, DEFAULT_UTILIZATION_WEEKS,
};

pub const STORAGE_ENV: &str = "SITETRACK_STORAGE";
pub const PROJECT_ENV: &str = "SITETRACK_PROJECT";

/// Longest history window, in days, a trend may look back.
pub const MAX_TREND_DAYS: i64 = 36_500;
/// Most weeks a weekly listing or utilization table may span.
pub const MAX_WEEKS: usize = 5_200;
/// Most days a forecast may extend past the data.
pub const MAX_FORECAST_PERIODS: usize = 3_650;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("{key} in config file {path} must be between {min} and {max}, got {value}")]
    OutOfRange {
        path: String,
        key: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("no storage file given (use --storage, SITETRACK_STORAGE or storage_path in the config)")]
    MissingStorage,
}

/// Settings shared by all subcommands. Precedence is command-line flag,
/// then environment, then config file, then these defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage_path: Option<String>,
    pub default_project_id: Option<String>,
    pub trend_days: i64,
    pub utilization_weeks: usize,
    pub forecast_periods: usize,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            default_project_id: None,
            trend_days: DEFAULT_TREND_DAYS,
            utilization_weeks: DEFAULT_UTILIZATION_WEEKS,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            chart_width: DEFAULT_WIDTH,
            chart_height: DEFAULT_HEIGHT,
        }
    }
}

impl AppConfig {
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config: Self =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let max_weeks = MAX_WEEKS as i64;
        let max_periods = MAX_FORECAST_PERIODS as i64;
        check_range(path, "trend_days", self.trend_days, 0..=MAX_TREND_DAYS)?;
        check_range(
            path,
            "utilization_weeks",
            i64::try_from(self.utilization_weeks).unwrap_or(i64::MAX),
            1..=max_weeks,
        )?;
        check_range(
            path,
            "forecast_periods",
            i64::try_from(self.forecast_periods).unwrap_or(i64::MAX),
            1..=max_periods,
        )
    }

    /// Reads the optional config file and applies environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| env::var(key).ok()))
    }

    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(storage) = lookup(STORAGE_ENV).filter(|value| !value.is_empty()) {
            self.storage_path = Some(storage);
        }
        if let Some(project) = lookup(PROJECT_ENV).filter(|value| !value.is_empty()) {
            self.default_project_id = Some(project);
        }
        self
    }

    pub fn storage_path(&self, flag: Option<&str>) -> Result<String, ConfigError> {
        flag.map(str::to_string)
            .or_else(|| self.storage_path.clone())
            .ok_or(ConfigError::MissingStorage)
    }

    pub fn project_id(&self, flag: Option<&str>) -> Option<RecordId> {
        flag.or(self.default_project_id.as_deref())
            .filter(|value| !value.trim().is_empty())
            .map(RecordId::new)
    }
}

fn check_range(
    path: &str,
    key: &'static str,
    value: i64,
    range: RangeInclusive<i64>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::OutOfRange {
        path: path.to_string(),
        key,
        value,
        min: *range.start(),
        max: *range.end(),
    })
}
