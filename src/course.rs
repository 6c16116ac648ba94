//! Identifier types shared by every stage of the pipeline.
//!
//! Course codes are always derived through [`CourseCode::from_section`] so the
//! section-stripping rule lives in exactly one place.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Normalized course code, e.g. `"NURS 417"` for section `"NURS 417-AC"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCode(String);

impl CourseCode {
    /// Strip the trailing `-suffix` section qualifier from a course section.
    pub fn from_section(section: &str) -> Self {
        let trimmed = section.trim();
        let code = match trimmed.split_once('-') {
            Some((code, _)) => code.trim_end(),
            None => trimmed,
        };
        Self(code.to_string())
    }

    /// Alphabetic department prefix (`"NURS"` for `"NURS 417"`).
    pub fn major(&self) -> &str {
        self.0
            .split_whitespace()
            .next()
            .unwrap_or(self.0.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CourseCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CourseCode {
    fn from(value: &str) -> Self {
        Self::from_section(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Natural meeting time of a course. Opaque: only compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeslot(String);

impl Timeslot {
    pub fn new(slot: impl Into<String>) -> Self {
        Self(slot.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One raw enrollment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRecord {
    pub student: StudentId,
    pub section: String,
    pub timeslot: Timeslot,
}

impl EnrollmentRecord {
    pub fn new(student: &str, section: &str, timeslot: &str) -> Self {
        Self {
            student: StudentId::new(student),
            section: section.trim().to_string(),
            timeslot: Timeslot::new(timeslot),
        }
    }

    pub fn course(&self) -> CourseCode {
        CourseCode::from_section(&self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_section_strips_section_suffix() {
        assert_eq!(CourseCode::from_section("NURS 417-AC").as_str(), "NURS 417");
        assert_eq!(CourseCode::from_section(" BIO 101-01 ").as_str(), "BIO 101");
        assert_eq!(CourseCode::from_section("CHEM 110").as_str(), "CHEM 110");
    }

    #[test]
    fn sections_of_one_course_compare_equal() {
        assert_eq!(
            CourseCode::from_section("MATH 120-01"),
            CourseCode::from_section("MATH 120-02")
        );
    }

    #[test]
    fn major_is_department_prefix() {
        assert_eq!(CourseCode::from_section("NURS 417-AC").major(), "NURS");
        assert_eq!(CourseCode::from_section("SOLO").major(), "SOLO");
    }
}
