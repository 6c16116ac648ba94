//! Greedy first-fit exam slot allocation.
//!
//! Courses are taken one at a time in popularity order and dropped into the
//! earliest slot that accepts them. A slot accepts a course when no enrolled
//! student already has [`DAILY_EXAM_CAP`] exams that day and either
//!
//! 1. the slot is vacant,
//! 2. every course already there shares the course's natural timeslot, or
//! 3. the rosters of the course and everything already there are disjoint.
//!
//! Placement is never revisited, so the result is deterministic for a given
//! popularity order but not minimal in slot count.

use crate::course::{CourseCode, StudentId};
use crate::relations::Relations;
use crate::schedule::{Schedule, ScheduleSlot};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use tracing::{debug, info};

/// Most exams one student may sit on a single day.
pub const DAILY_EXAM_CAP: u32 = 2;

/// Exams already placed per `(day, student)`. Counts only go up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDailyLoad {
    days: HashMap<usize, HashMap<StudentId, u32>>,
}

impl StudentDailyLoad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exams_on(&self, day: usize, student: &StudentId) -> u32 {
        self.days
            .get(&day)
            .and_then(|students| students.get(student))
            .copied()
            .unwrap_or(0)
    }

    /// True if any student in `roster` is already at the cap on `day`.
    pub fn blocks<'s, I>(&self, day: usize, roster: I) -> bool
    where
        I: IntoIterator<Item = &'s StudentId>,
    {
        let Some(students) = self.days.get(&day) else {
            return false;
        };
        roster
            .into_iter()
            .any(|student| students.get(student).copied().unwrap_or(0) >= DAILY_EXAM_CAP)
    }

    pub fn record<'s, I>(&mut self, day: usize, roster: I)
    where
        I: IntoIterator<Item = &'s StudentId>,
    {
        let students = self.days.entry(day).or_default();
        for student in roster {
            *students.entry(student.clone()).or_insert(0) += 1;
        }
    }

    /// Number of `(day, student)` entries.
    pub fn len(&self) -> usize {
        self.days.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one allocation run accumulates.
#[derive(Debug, Clone, Default)]
pub struct AllocationState {
    pub schedule: Schedule,
    pub daily_load: StudentDailyLoad,
}

impl AllocationState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct SlotAllocator<'a> {
    relations: &'a Relations,
    tests_per_day: NonZeroUsize,
    empty_roster: HashSet<StudentId>,
}

impl<'a> SlotAllocator<'a> {
    pub fn new(relations: &'a Relations, tests_per_day: NonZeroUsize) -> Self {
        Self {
            relations,
            tests_per_day,
            empty_roster: HashSet::new(),
        }
    }

    /// Place every course in popularity order.
    pub fn allocate(&self) -> AllocationState {
        let mut state = AllocationState::new();
        for course in self.relations.popularity_order() {
            self.place(&mut state, course);
        }
        info!(
            courses = state.schedule.course_count(),
            slots = state.schedule.len(),
            "allocation finished"
        );
        state
    }

    /// Place one course into the earliest compatible slot and return its index.
    ///
    /// Always terminates: past the last populated day an appended slot has no
    /// daily load and takes the course.
    pub fn place(&self, state: &mut AllocationState, course: &CourseCode) -> usize {
        let roster = self.roster(course);
        let mut index = 0;
        loop {
            let day = index / self.tests_per_day.get();
            let daily_conflict = state.daily_load.blocks(day, roster);

            if index >= state.schedule.len() {
                if !daily_conflict {
                    state
                        .schedule
                        .push_slot(ScheduleSlot::with_courses(vec![course.clone()]));
                    return self.commit(state, course, index, day, roster);
                }
                state.schedule.push_slot(ScheduleSlot::new());
            } else if !daily_conflict {
                let accepts = match state.schedule.slot(index) {
                    Some(slot) if slot.is_empty() => true,
                    Some(slot) => {
                        !self.time_mismatch(course, slot) || !self.roster_overlap(course, slot)
                    }
                    None => false,
                };
                if accepts {
                    if let Some(slot) = state.schedule.slot_mut(index) {
                        slot.push(course.clone());
                    }
                    return self.commit(state, course, index, day, roster);
                }
            }
            index += 1;
        }
    }

    fn commit(
        &self,
        state: &mut AllocationState,
        course: &CourseCode,
        index: usize,
        day: usize,
        roster: &HashSet<StudentId>,
    ) -> usize {
        state.daily_load.record(day, roster);
        debug!(course = %course, slot = index, day, students = roster.len(), "placed course");
        index
    }

    fn roster(&self, course: &CourseCode) -> &HashSet<StudentId> {
        self.relations.roster(course).unwrap_or(&self.empty_roster)
    }

    /// Any course in the slot meets at a different natural time.
    fn time_mismatch(&self, course: &CourseCode, slot: &ScheduleSlot) -> bool {
        let time = self.relations.timeslot(course);
        slot.courses()
            .iter()
            .any(|other| self.relations.timeslot(other) != time)
    }

    /// The union of all rosters is smaller than the sum of their sizes.
    fn roster_overlap(&self, course: &CourseCode, slot: &ScheduleSlot) -> bool {
        let members = std::iter::once(course).chain(slot.courses());
        let mut union: HashSet<&StudentId> = HashSet::new();
        let mut total = 0;
        for member in members {
            let roster = self.roster(member);
            total += roster.len();
            union.extend(roster.iter());
        }
        union.len() < total
    }
}
