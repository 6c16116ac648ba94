use crate::course::CourseCode;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::Schedule;
use std::collections::HashSet;

pub mod file;

pub use file::{
    ScheduleSnapshot, load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv,
    save_schedule_to_json,
};

/// A stored schedule must place each course at most once and carry a
/// usable period count.
pub fn validate_schedule(schedule: &Schedule, tests_per_day: usize) -> ScheduleResult<()> {
    if tests_per_day == 0 {
        return Err(ScheduleError::InvalidInputFormat(
            "tests_per_day must be at least 1".into(),
        ));
    }
    let mut seen: HashSet<&CourseCode> = HashSet::with_capacity(schedule.course_count());
    for (index, slot) in schedule.populated_slots() {
        for course in slot.courses() {
            if course.as_str().is_empty() {
                return Err(ScheduleError::InvalidInputFormat(format!(
                    "slot {} holds an empty course code",
                    index + 1
                )));
            }
            if !seen.insert(course) {
                return Err(ScheduleError::InvalidInputFormat(format!(
                    "duplicate course {course}"
                )));
            }
        }
    }
    Ok(())
}
