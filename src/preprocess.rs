//! Enrollment cleaning: drop incomplete rows, lab and administrative
//! sections, and courses that do not give a final.

use crate::course::CourseCode;
use crate::enrollment::{COURSE, COURSE_SECTION, SID, TIME_SLOT, select_required_columns};
use crate::error::{ScheduleError, ScheduleResult};
use polars::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::info;

/// Lab sections (`BIO 101L-01`), the SIM orientation course and CR sections.
pub const DEFAULT_EXCLUSION_PATTERNS: [&str; 3] = [r"^\w+ \d+L-", r"\bSIM\b", r"\bCR\b"];

/// Section patterns that never carry a final exam.
#[derive(Debug, Clone, Default)]
pub struct ExclusionPatterns {
    patterns: Vec<Regex>,
}

impl ExclusionPatterns {
    pub fn new<I, S>(patterns: I) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|err| {
                    ScheduleError::InvalidConfig(format!(
                        "invalid exclusion pattern '{}': {err}",
                        p.as_ref()
                    ))
                })
            })
            .collect::<ScheduleResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn standard() -> ScheduleResult<Self> {
        Self::new(DEFAULT_EXCLUSION_PATTERNS)
    }

    pub fn is_excluded(&self, section: &str) -> bool {
        let section = section.trim();
        self.patterns.iter().any(|p| p.is_match(section))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Which courses give a final exam.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseSelection {
    courses: BTreeMap<CourseCode, bool>,
}

impl CourseSelection {
    /// Every listed course starts out without a final.
    pub fn new<I: IntoIterator<Item = CourseCode>>(courses: I) -> Self {
        Self {
            courses: courses.into_iter().map(|c| (c, false)).collect(),
        }
    }

    pub fn all_included<I: IntoIterator<Item = CourseCode>>(courses: I) -> Self {
        Self {
            courses: courses.into_iter().map(|c| (c, true)).collect(),
        }
    }

    pub fn set(&mut self, course: CourseCode, include: bool) {
        self.courses.insert(course, include);
    }

    pub fn include(&mut self, course: CourseCode) {
        self.set(course, true);
    }

    pub fn exclude(&mut self, course: CourseCode) {
        self.set(course, false);
    }

    /// Flip a course; returns the new state.
    pub fn toggle(&mut self, course: CourseCode) -> bool {
        let entry = self.courses.entry(course).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn include_all(&mut self) {
        for include in self.courses.values_mut() {
            *include = true;
        }
    }

    /// Include every known course of one major. Returns how many matched.
    pub fn include_major(&mut self, major: &str) -> usize {
        let mut matched = 0;
        for (course, include) in self.courses.iter_mut() {
            if course.major().eq_ignore_ascii_case(major) {
                *include = true;
                matched += 1;
            }
        }
        matched
    }

    pub fn is_included(&self, course: &CourseCode) -> bool {
        self.courses.get(course).copied().unwrap_or(false)
    }

    pub fn contains(&self, course: &CourseCode) -> bool {
        self.courses.contains_key(course)
    }

    pub fn included(&self) -> impl Iterator<Item = &CourseCode> {
        self.courses
            .iter()
            .filter(|(_, include)| **include)
            .map(|(course, _)| course)
    }

    pub fn included_count(&self) -> usize {
        self.courses.values().filter(|include| **include).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CourseCode, bool)> {
        self.courses.iter().map(|(course, include)| (course, *include))
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl FromIterator<(CourseCode, bool)> for CourseSelection {
    fn from_iter<T: IntoIterator<Item = (CourseCode, bool)>>(iter: T) -> Self {
        Self {
            courses: iter.into_iter().collect(),
        }
    }
}

/// Filter an enrollment frame down to final-bearing rows.
///
/// Returns the contract columns plus a [`COURSE`] column with the normalized
/// course code of each kept row.
pub fn clean_enrollment(
    df: &DataFrame,
    selection: &CourseSelection,
    patterns: &ExclusionPatterns,
) -> ScheduleResult<DataFrame> {
    let df = select_required_columns(df)?;
    let sids = df.column(SID)?.str()?;
    let sections = df.column(COURSE_SECTION)?.str()?;
    let slots = df.column(TIME_SLOT)?.str()?;

    let mut keep: Vec<bool> = Vec::with_capacity(df.height());
    let mut codes: Vec<String> = Vec::new();
    for ((sid, section), slot) in sids.into_iter().zip(sections).zip(slots) {
        let kept = match (sid, section, slot) {
            (Some(sid), Some(section), Some(slot))
                if !sid.trim().is_empty()
                    && !section.trim().is_empty()
                    && !slot.trim().is_empty() =>
            {
                let code = CourseCode::from_section(section);
                if !patterns.is_excluded(section) && selection.is_included(&code) {
                    codes.push(code.as_str().to_string());
                    true
                } else {
                    false
                }
            }
            _ => false,
        };
        keep.push(kept);
    }

    let mask = Series::new(PlSmallStr::from_static("keep"), keep);
    let mut filtered = df.filter(mask.bool()?)?;
    filtered.with_column(Series::new(PlSmallStr::from_static(COURSE), codes))?;

    info!(
        kept = filtered.height(),
        dropped = df.height() - filtered.height(),
        "cleaned enrollment table"
    );
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_patterns_match_labs_and_admin_sections() {
        let patterns = ExclusionPatterns::standard().unwrap();
        assert!(patterns.is_excluded("BIO 101L-01"));
        assert!(patterns.is_excluded("SIM 101-01"));
        assert!(patterns.is_excluded("CR 100-02"));
        assert!(!patterns.is_excluded("BIO 101-01"));
        assert!(!patterns.is_excluded("CRIM 210-01"));
    }

    #[test]
    fn padded_lab_section_is_still_excluded() {
        let patterns = ExclusionPatterns::standard().unwrap();
        assert!(patterns.is_excluded(" BIO 101L-01"));
        assert!(patterns.is_excluded("\tCHEM 111L-02 "));
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let result = ExclusionPatterns::new(["("]);
        assert!(matches!(result, Err(ScheduleError::InvalidConfig(_))));
    }

    #[test]
    fn selection_defaults_to_excluded_and_toggles() {
        let mut selection = CourseSelection::new([CourseCode::from_section("BIO 101")]);
        let bio = CourseCode::from_section("BIO 101");
        assert!(!selection.is_included(&bio));
        assert!(selection.toggle(bio.clone()));
        assert!(selection.is_included(&bio));
        assert!(!selection.toggle(bio.clone()));
    }

    #[test]
    fn include_major_is_case_insensitive() {
        let mut selection = CourseSelection::new(
            ["NURS 101", "NURS 417", "BIO 101"].map(CourseCode::from_section),
        );
        assert_eq!(selection.include_major("nurs"), 2);
        assert_eq!(selection.included_count(), 2);
    }

    #[test]
    fn clean_enrollment_adds_course_column() {
        let df = df!(
            "SID" => &["1", "2", "3"],
            "CourseSection" => &["BIO 101-01", "BIO 101L-01", "MATH 120-02"],
            "Time Slot" => &["A", "B", "C"]
        )
        .unwrap();
        let selection = CourseSelection::all_included(
            ["BIO 101", "MATH 120"].map(CourseCode::from_section),
        );
        let cleaned =
            clean_enrollment(&df, &selection, &ExclusionPatterns::standard().unwrap()).unwrap();
        assert_eq!(cleaned.height(), 2);
        let courses: Vec<Option<&str>> =
            cleaned.column(COURSE).unwrap().str().unwrap().into_iter().collect();
        assert_eq!(courses, vec![Some("BIO 101"), Some("MATH 120")]);
    }
}
