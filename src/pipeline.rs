//! End-to-end run: clean the enrollment table, build relations, allocate,
//! verify, and optionally render.

use crate::allocator::SlotAllocator;
use crate::config::SchedulerConfig;
use crate::enrollment::load_enrollment_csv;
use crate::error::ScheduleResult;
use crate::persistence::ScheduleSnapshot;
use crate::preprocess::{CourseSelection, clean_enrollment};
use crate::relations::{RelationBuilder, Relations};
use crate::render::render_schedule;
use crate::schedule::Schedule;
use crate::validation::{VerificationReport, verify};
use polars::prelude::DataFrame;
use std::fmt::Write as _;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{info, warn};

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct ScheduleRun {
    pub relations: Relations,
    pub schedule: Schedule,
    pub report: VerificationReport,
    pub tests_per_day: NonZeroUsize,
}

impl ScheduleRun {
    pub fn console_dump(&self) -> String {
        self.schedule.console_dump(self.tests_per_day.get())
    }

    pub fn snapshot(&self) -> ScheduleResult<ScheduleSnapshot> {
        ScheduleSnapshot::new(self.schedule.clone(), self.tests_per_day.get())
    }

    /// Write the xlsx sheet using the layout settings in `config`.
    pub fn render<P: AsRef<Path>>(&self, config: &SchedulerConfig, path: P) -> ScheduleResult<()> {
        render_schedule(&self.schedule, &config.render_options()?, path)
    }
}

pub fn generate_from_frame(
    df: &DataFrame,
    selection: &CourseSelection,
    config: &SchedulerConfig,
) -> ScheduleResult<ScheduleRun> {
    config.validate()?;
    let tests_per_day = config.tests_per_day()?;

    let cleaned = clean_enrollment(df, selection, &config.exclusions()?)?;
    let relations = RelationBuilder::new(&cleaned).build()?;
    let state = SlotAllocator::new(&relations, tests_per_day).allocate();
    let report = verify(
        &state.schedule,
        &relations,
        tests_per_day,
        config.max_final_days,
    );
    for finding in report.findings() {
        warn!(%finding, "schedule verification");
    }
    info!(
        courses = relations.len(),
        slots = state.schedule.len(),
        days = state.schedule.days_used(tests_per_day.get()),
        "generated schedule"
    );

    Ok(ScheduleRun {
        relations,
        schedule: state.schedule,
        report,
        tests_per_day,
    })
}

pub fn generate_from_csv<P: AsRef<Path>>(
    path: P,
    selection: &CourseSelection,
    config: &SchedulerConfig,
) -> ScheduleResult<ScheduleRun> {
    let df = load_enrollment_csv(path)?;
    generate_from_frame(&df, selection, config)
}

/// Settings confirmed before generation.
pub fn review_summary(
    source: Option<&Path>,
    selection: &CourseSelection,
    config: &SchedulerConfig,
) -> String {
    let finals: Vec<&str> = selection.included().map(|c| c.as_str()).collect();
    let mut out = String::new();
    let location = source.map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
    let _ = writeln!(out, "Spreadsheet Location: {location}");
    let _ = writeln!(out, "Courses With Finals: {}", finals.join(", "));
    let _ = writeln!(out, "Max Daily Finals: {}", config.max_tests_per_day);
    let _ = writeln!(out, "Max Final Days: {}", config.max_final_days);
    out
}
