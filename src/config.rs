use crate::calendar::ExamCalendar;
use crate::error::{ScheduleError, ScheduleResult};
use crate::preprocess::{DEFAULT_EXCLUSION_PATTERNS, ExclusionPatterns};
use crate::render::{MAX_SHEET_ROWS, RenderOptions};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

/// Run parameters. Every field has a default, so a config file only needs
/// the values it changes.
///
/// Dates are strings in TOML (`first_exam_date = "2025-12-08"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub max_tests_per_day: usize,
    /// Target number of exam days. Exceeding it only produces a warning.
    pub max_final_days: usize,
    /// Defaults to `max_tests_per_day`.
    pub periods_per_day: Option<usize>,
    pub compact: bool,
    pub max_rows_per_column: usize,
    pub exclusion_patterns: Vec<String>,
    pub first_exam_date: Option<NaiveDate>,
    pub working_days: Vec<Weekday>,
    pub holidays: Vec<NaiveDate>,
    pub sheet_name: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_tests_per_day: 4,
            max_final_days: 4,
            periods_per_day: None,
            compact: false,
            max_rows_per_column: 15,
            exclusion_patterns: DEFAULT_EXCLUSION_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            first_exam_date: None,
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            holidays: Vec::new(),
            sheet_name: "Finals".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ScheduleResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if self.max_tests_per_day == 0 {
            return Err(ScheduleError::InvalidConfig(
                "max_tests_per_day must be at least 1".into(),
            ));
        }
        if self.max_final_days == 0 {
            return Err(ScheduleError::InvalidConfig(
                "max_final_days must be at least 1".into(),
            ));
        }
        if self.periods_per_day == Some(0) {
            return Err(ScheduleError::InvalidConfig(
                "periods_per_day must be at least 1".into(),
            ));
        }
        if self.max_rows_per_column == 0 || self.max_rows_per_column > MAX_SHEET_ROWS {
            return Err(ScheduleError::InvalidConfig(format!(
                "max_rows_per_column must be between 1 and {MAX_SHEET_ROWS}"
            )));
        }
        if self.working_days.is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "working_days must name at least one weekday".into(),
            ));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(ScheduleError::InvalidConfig("sheet_name is empty".into()));
        }
        self.exclusions()?;
        Ok(())
    }

    pub fn tests_per_day(&self) -> ScheduleResult<NonZeroUsize> {
        NonZeroUsize::new(self.max_tests_per_day).ok_or_else(|| {
            ScheduleError::InvalidConfig("max_tests_per_day must be at least 1".into())
        })
    }

    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day.unwrap_or(self.max_tests_per_day)
    }

    pub fn exclusions(&self) -> ScheduleResult<ExclusionPatterns> {
        ExclusionPatterns::new(&self.exclusion_patterns)
    }

    /// Exam calendar, if a first exam date is configured.
    pub fn calendar(&self) -> ScheduleResult<Option<ExamCalendar>> {
        self.first_exam_date
            .map(|first| ExamCalendar::custom(first, &self.working_days, &self.holidays))
            .transpose()
    }

    pub fn render_options(&self) -> ScheduleResult<RenderOptions> {
        Ok(RenderOptions {
            periods_per_day: self.periods_per_day(),
            compact: self.compact,
            max_rows_per_column: self.max_rows_per_column,
            sheet_name: self.sheet_name.clone(),
            calendar: self.calendar()?,
        })
    }
}
