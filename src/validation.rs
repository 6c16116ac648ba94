//! Post-run checks on a finished schedule.

use crate::allocator::DAILY_EXAM_CAP;
use crate::course::{CourseCode, StudentId};
use crate::relations::Relations;
use crate::schedule::Schedule;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// Two courses in one slot share students.
    DoubleBooking {
        slot: usize,
        first: CourseCode,
        second: CourseCode,
        shared_students: usize,
    },
    DailyCapExceeded {
        day: usize,
        student: StudentId,
        exams: u32,
    },
    MissingCourse(CourseCode),
    DuplicateCourse {
        course: CourseCode,
        slots: Vec<usize>,
    },
    /// More exam days than the advisory budget.
    DayBudgetExceeded { used: usize, budget: usize },
}

impl Finding {
    /// Advisory findings do not mean the schedule is wrong.
    pub fn is_advisory(&self) -> bool {
        matches!(self, Finding::DayBudgetExceeded { .. })
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::DoubleBooking {
                slot,
                first,
                second,
                shared_students,
            } => write!(
                f,
                "slot {} holds {first} and {second}, which share {shared_students} student(s)",
                slot + 1
            ),
            Finding::DailyCapExceeded {
                day,
                student,
                exams,
            } => write!(
                f,
                "student {student} has {exams} exams on day {} (cap is {DAILY_EXAM_CAP})",
                day + 1
            ),
            Finding::MissingCourse(course) => write!(f, "course {course} was never placed"),
            Finding::DuplicateCourse { course, slots } => {
                let slots: Vec<String> = slots.iter().map(|s| (s + 1).to_string()).collect();
                write!(f, "course {course} appears in slots {}", slots.join(", "))
            }
            Finding::DayBudgetExceeded { used, budget } => write!(
                f,
                "schedule needs {used} exam days but the target is {budget}; student conflicts forced the extra days"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    findings: Vec<Finding>,
}

impl VerificationReport {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// No findings at all, advisory included.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings that indicate a broken schedule.
    pub fn violations(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_advisory())
    }

    pub fn has_violations(&self) -> bool {
        self.violations().next().is_some()
    }
}

/// Check a schedule against the relations it was built from.
pub fn verify(
    schedule: &Schedule,
    relations: &Relations,
    tests_per_day: NonZeroUsize,
    max_final_days: usize,
) -> VerificationReport {
    let mut findings = double_bookings(schedule, relations);
    findings.extend(daily_cap_violations(schedule, relations, tests_per_day));
    findings.extend(placement_findings(schedule, relations));

    let used = schedule.days_used(tests_per_day.get());
    if used > max_final_days {
        findings.push(Finding::DayBudgetExceeded {
            used,
            budget: max_final_days,
        });
    }
    VerificationReport { findings }
}

fn double_bookings(schedule: &Schedule, relations: &Relations) -> Vec<Finding> {
    schedule
        .slots()
        .par_iter()
        .enumerate()
        .flat_map_iter(|(index, slot)| {
            let courses = slot.courses();
            let mut found = Vec::new();
            for (i, first) in courses.iter().enumerate() {
                let Some(first_roster) = relations.roster(first) else {
                    continue;
                };
                for second in &courses[i + 1..] {
                    let Some(second_roster) = relations.roster(second) else {
                        continue;
                    };
                    let shared = first_roster.intersection(second_roster).count();
                    if shared > 0 {
                        found.push(Finding::DoubleBooking {
                            slot: index,
                            first: first.clone(),
                            second: second.clone(),
                            shared_students: shared,
                        });
                    }
                }
            }
            found
        })
        .collect()
}

fn daily_cap_violations(
    schedule: &Schedule,
    relations: &Relations,
    tests_per_day: NonZeroUsize,
) -> Vec<Finding> {
    let mut counts: BTreeMap<(usize, &StudentId), u32> = BTreeMap::new();
    for (index, slot) in schedule.populated_slots() {
        let day = index / tests_per_day.get();
        for course in slot.courses() {
            for student in relations.roster(course).into_iter().flatten() {
                *counts.entry((day, student)).or_insert(0) += 1;
            }
        }
    }
    counts
        .into_iter()
        .filter(|(_, exams)| *exams > DAILY_EXAM_CAP)
        .map(|((day, student), exams)| Finding::DailyCapExceeded {
            day,
            student: student.clone(),
            exams,
        })
        .collect()
}

fn placement_findings(schedule: &Schedule, relations: &Relations) -> Vec<Finding> {
    let mut placements: HashMap<&CourseCode, Vec<usize>> = HashMap::new();
    for (index, slot) in schedule.populated_slots() {
        for course in slot.courses() {
            placements.entry(course).or_default().push(index);
        }
    }

    let mut findings = Vec::new();
    for course in relations.popularity_order() {
        match placements.get(course) {
            None => findings.push(Finding::MissingCourse(course.clone())),
            Some(slots) if slots.len() > 1 => findings.push(Finding::DuplicateCourse {
                course: course.clone(),
                slots: slots.clone(),
            }),
            Some(_) => {}
        }
    }
    findings
}
