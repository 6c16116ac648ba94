pub mod layout;
pub mod xlsx;

use crate::calendar::ExamCalendar;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::Schedule;
use std::path::Path;
use tracing::info;

pub use layout::{SheetLayout, build_layout};

/// Row count of an xlsx worksheet.
pub const MAX_SHEET_ROWS: usize = 1_048_576;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub periods_per_day: usize,
    /// Wrap long slots into extra course/room column pairs.
    pub compact: bool,
    pub max_rows_per_column: usize,
    pub sheet_name: String,
    /// Dated day labels; plain `Day N` labels without one.
    pub calendar: Option<ExamCalendar>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            periods_per_day: 4,
            compact: false,
            max_rows_per_column: 15,
            sheet_name: "Finals".to_string(),
            calendar: None,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.periods_per_day == 0 {
            return Err(ScheduleError::Render(
                "periods per day must be at least 1".into(),
            ));
        }
        if self.max_rows_per_column == 0 || self.max_rows_per_column > MAX_SHEET_ROWS {
            return Err(ScheduleError::Render(format!(
                "max rows per column must be between 1 and {MAX_SHEET_ROWS}"
            )));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(ScheduleError::Render("sheet name is empty".into()));
        }
        Ok(())
    }
}

/// Lay out `schedule` and write it as an xlsx workbook at `path`.
pub fn render_schedule<P: AsRef<Path>>(
    schedule: &Schedule,
    options: &RenderOptions,
    path: P,
) -> ScheduleResult<()> {
    let layout = build_layout(schedule, options)?;
    xlsx::save(&layout, path.as_ref())?;
    info!(
        path = %path.as_ref().display(),
        slots = schedule.populated_slots().count(),
        "rendered schedule"
    );
    Ok(())
}

pub fn render_to_buffer(schedule: &Schedule, options: &RenderOptions) -> ScheduleResult<Vec<u8>> {
    let layout = build_layout(schedule, options)?;
    xlsx::to_buffer(&layout)
}
