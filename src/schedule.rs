use crate::course::CourseCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

/// Courses examined together in one exam period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleSlot {
    courses: Vec<CourseCode>,
}

impl ScheduleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_courses(courses: Vec<CourseCode>) -> Self {
        Self { courses }
    }

    /// Courses in placement order.
    pub fn courses(&self) -> &[CourseCode] {
        &self.courses
    }

    /// Courses in lexicographic order, as printed and rendered.
    pub fn sorted_courses(&self) -> Vec<&CourseCode> {
        let mut sorted: Vec<&CourseCode> = self.courses.iter().collect();
        sorted.sort();
        sorted
    }

    pub fn contains(&self, course: &CourseCode) -> bool {
        self.courses.contains(course)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub(crate) fn push(&mut self, course: CourseCode) {
        self.courses.push(course);
    }
}

/// Day and period of a slot index, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotPosition {
    pub day: usize,
    pub period: usize,
}

impl SlotPosition {
    /// `periods_per_day` must be non-zero.
    pub fn from_index(index: usize, periods_per_day: usize) -> Self {
        Self {
            day: index / periods_per_day,
            period: index % periods_per_day,
        }
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DAY {}: SLOT {}", self.day + 1, self.period + 1)
    }
}

/// Ordered exam slots; index 0 is the earliest period.
///
/// Slots are only ever appended, and a slot's course list only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    slots: Vec<ScheduleSlot>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slots(slots: Vec<ScheduleSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[ScheduleSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&ScheduleSlot> {
        self.slots.get(index)
    }

    /// Number of slots, including vacant ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slot holds a course.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(ScheduleSlot::is_empty)
    }

    pub fn populated_slots(&self) -> impl Iterator<Item = (usize, &ScheduleSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_empty())
    }

    pub fn course_count(&self) -> usize {
        self.slots.iter().map(ScheduleSlot::len).sum()
    }

    /// Index of the slot holding `course`.
    pub fn slot_of(&self, course: &CourseCode) -> Option<usize> {
        self.slots.iter().position(|slot| slot.contains(course))
    }

    /// Number of exam days the slots span.
    pub fn days_used(&self, periods_per_day: usize) -> usize {
        self.slots.len().div_ceil(periods_per_day)
    }

    /// Per-slot listing followed by the slot total.
    pub fn console_dump(&self, periods_per_day: usize) -> String {
        let mut out = String::new();
        for (index, slot) in self.populated_slots() {
            let position = SlotPosition::from_index(index, periods_per_day);
            let courses: Vec<&str> = slot.sorted_courses().into_iter().map(CourseCode::as_str).collect();
            let _ = writeln!(out, "{position}:");
            let _ = writeln!(out, "{}", courses.join(", "));
            out.push('\n');
        }
        let _ = writeln!(out, "Number of slots used: {}", self.slots.len());
        out
    }

    pub(crate) fn push_slot(&mut self, slot: ScheduleSlot) {
        self.slots.push(slot);
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut ScheduleSlot> {
        self.slots.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(codes: &[&str]) -> ScheduleSlot {
        ScheduleSlot::with_courses(codes.iter().map(|c| CourseCode::from_section(c)).collect())
    }

    #[test]
    fn position_splits_index_into_day_and_period() {
        assert_eq!(
            SlotPosition::from_index(5, 4),
            SlotPosition { day: 1, period: 1 }
        );
        assert_eq!(SlotPosition::from_index(5, 4).to_string(), "DAY 2: SLOT 2");
    }

    #[test]
    fn empty_slots_do_not_make_schedule_non_empty() {
        let schedule = Schedule::from_slots(vec![ScheduleSlot::new()]);
        assert!(schedule.is_empty());
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn console_dump_lists_sorted_courses_and_total() {
        let schedule = Schedule::from_slots(vec![
            slot(&["MATH 120", "BIO 101"]),
            ScheduleSlot::new(),
            slot(&["NURS 417"]),
        ]);
        let dump = schedule.console_dump(2);
        assert!(dump.starts_with("DAY 1: SLOT 1:\nBIO 101, MATH 120\n"));
        assert!(dump.contains("DAY 2: SLOT 1:\nNURS 417\n"));
        assert!(!dump.contains("DAY 1: SLOT 2"));
        assert!(dump.ends_with("Number of slots used: 3\n"));
    }

    #[test]
    fn days_used_rounds_up() {
        let schedule = Schedule::from_slots(vec![slot(&["A 1"]); 5]);
        assert_eq!(schedule.days_used(4), 2);
        assert_eq!(schedule.days_used(5), 1);
    }
}
