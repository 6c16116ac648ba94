//! Enrollment table loading.
//!
//! The enrollment export is a delimited file with a header row carrying the
//! columns `SID`, `CourseSection` and `Time Slot`. Every column is read as a
//! string: student ids and timeslots are opaque keys, never numbers.

use crate::course::{CourseCode, EnrollmentRecord};
use crate::error::{ScheduleError, ScheduleResult};
use crate::preprocess::ExclusionPatterns;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

pub const SID: &str = "SID";
pub const COURSE_SECTION: &str = "CourseSection";
pub const TIME_SLOT: &str = "Time Slot";
/// Derived column holding the normalized course code.
pub const COURSE: &str = "Course";

pub const REQUIRED_COLUMNS: [&str; 3] = [SID, COURSE_SECTION, TIME_SLOT];

/// Load an enrollment CSV. Any failure is reported as [`ScheduleError::BadSourceFile`].
pub fn load_enrollment_csv<P: AsRef<Path>>(path: P) -> ScheduleResult<DataFrame> {
    let path = path.as_ref();
    read_enrollment_csv(path).map_err(|err| ScheduleError::bad_source_file(path, err))
}

fn read_enrollment_csv(path: &Path) -> ScheduleResult<DataFrame> {
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    let df = select_required_columns(&raw)?;
    info!(
        rows = df.height(),
        path = %path.display(),
        "loaded enrollment table"
    );
    Ok(df)
}

/// Keep only the three contract columns, cast to strings.
///
/// Fails with [`ScheduleError::InvalidInputFormat`] naming the first missing column.
pub fn select_required_columns(df: &DataFrame) -> ScheduleResult<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        let column = df.column(name).map_err(|_| {
            ScheduleError::InvalidInputFormat(format!("missing required column '{name}'"))
        })?;
        columns.push(column.cast(&DataType::String)?);
    }
    Ok(DataFrame::new(columns)?)
}

/// Build an enrollment frame from in-memory records.
pub fn frame_from_records(records: &[EnrollmentRecord]) -> PolarsResult<DataFrame> {
    let sids: Vec<&str> = records.iter().map(|r| r.student.as_str()).collect();
    let sections: Vec<&str> = records.iter().map(|r| r.section.as_str()).collect();
    let slots: Vec<&str> = records.iter().map(|r| r.timeslot.as_str()).collect();
    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static(SID), sids).into_column(),
        Series::new(PlSmallStr::from_static(COURSE_SECTION), sections).into_column(),
        Series::new(PlSmallStr::from_static(TIME_SLOT), slots).into_column(),
    ])
}

/// Rows with all three fields present, in table order.
pub fn records_from_frame(df: &DataFrame) -> ScheduleResult<Vec<EnrollmentRecord>> {
    let df = select_required_columns(df)?;
    let sids = df.column(SID)?.str()?;
    let sections = df.column(COURSE_SECTION)?.str()?;
    let slots = df.column(TIME_SLOT)?.str()?;

    let records = sids
        .into_iter()
        .zip(sections)
        .zip(slots)
        .filter_map(|((sid, section), slot)| match (sid, section, slot) {
            (Some(sid), Some(section), Some(slot)) => {
                Some(EnrollmentRecord::new(sid, section, slot))
            }
            _ => None,
        })
        .collect();
    Ok(records)
}

/// Distinct course codes eligible for a final, sorted.
///
/// Lab and administrative sections matching `patterns` are left out, so the
/// list is what a user chooses from when marking courses that give finals.
pub fn available_courses(
    df: &DataFrame,
    patterns: &ExclusionPatterns,
) -> ScheduleResult<Vec<CourseCode>> {
    let df = select_required_columns(df)?;
    let courses: BTreeSet<CourseCode> = df
        .column(COURSE_SECTION)?
        .str()?
        .into_iter()
        .flatten()
        .filter(|section| !section.trim().is_empty() && !patterns.is_excluded(section))
        .map(CourseCode::from_section)
        .collect();
    Ok(courses.into_iter().collect())
}

/// Group course codes by major, majors in alphabetical order.
pub fn group_by_major(courses: &[CourseCode]) -> Vec<(String, Vec<CourseCode>)> {
    let mut groups: BTreeMap<String, Vec<CourseCode>> = BTreeMap::new();
    for course in courses {
        groups
            .entry(course.major().to_string())
            .or_default()
            .push(course.clone());
    }
    groups
        .into_iter()
        .map(|(major, mut codes)| {
            codes.sort();
            (major, codes)
        })
        .collect()
}
