use super::validate_schedule;
use crate::course::CourseCode;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{Schedule, ScheduleSlot, SlotPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// A finished schedule plus the period count needed to re-render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub tests_per_day: usize,
    pub schedule: Schedule,
}

impl ScheduleSnapshot {
    pub fn new(schedule: Schedule, tests_per_day: usize) -> ScheduleResult<Self> {
        validate_schedule(&schedule, tests_per_day)?;
        Ok(Self {
            tests_per_day,
            schedule,
        })
    }
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    snapshot: &ScheduleSnapshot,
    path: P,
) -> ScheduleResult<()> {
    validate_schedule(&snapshot.schedule, snapshot.tests_per_day)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> ScheduleResult<ScheduleSnapshot> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    validate_schedule(&snapshot.schedule, snapshot.tests_per_day)?;
    Ok(snapshot)
}

/// One placed course per row. Day and period are one-based for people
/// reading the file; the slot index is what loading relies on.
#[derive(Debug, Serialize, Deserialize)]
struct PlacementCsvRecord {
    slot: usize,
    day: usize,
    period: usize,
    course: String,
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(
    snapshot: &ScheduleSnapshot,
    path: P,
) -> ScheduleResult<()> {
    validate_schedule(&snapshot.schedule, snapshot.tests_per_day)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (index, slot) in snapshot.schedule.populated_slots() {
        let position = SlotPosition::from_index(index, snapshot.tests_per_day);
        for course in slot.sorted_courses() {
            writer.serialize(PlacementCsvRecord {
                slot: index,
                day: position.day + 1,
                period: position.period + 1,
                course: course.as_str().to_string(),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Vacant periods a capped day can leave are bounded by the period count,
/// so a slot index beyond `rows * tests_per_day` cannot come from a saved run.
fn slot_limit(rows: usize, tests_per_day: usize) -> usize {
    rows.saturating_mul(tests_per_day.max(1))
}

/// Rebuild a schedule from placement rows. Slots with no rows come back
/// vacant, so slot indices survive the round trip.
pub fn load_schedule_from_csv<P: AsRef<Path>>(
    path: P,
    tests_per_day: usize,
) -> ScheduleResult<ScheduleSnapshot> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut by_slot: BTreeMap<usize, Vec<CourseCode>> = BTreeMap::new();
    let mut rows = 0usize;
    for record in reader.deserialize::<PlacementCsvRecord>() {
        let record = record?;
        let course = CourseCode::from_section(&record.course);
        if course.as_str().is_empty() {
            return Err(ScheduleError::InvalidInputFormat(format!(
                "slot {} has an empty course",
                record.slot
            )));
        }
        by_slot.entry(record.slot).or_default().push(course);
        rows += 1;
    }

    let Some(&last) = by_slot.keys().next_back() else {
        return Err(ScheduleError::InvalidInputFormat(
            "CSV file contained no placements".into(),
        ));
    };
    let limit = slot_limit(rows, tests_per_day);
    let len = match last.checked_add(1) {
        Some(len) if len <= limit => len,
        _ => {
            return Err(ScheduleError::InvalidInputFormat(format!(
                "slot index {last} is out of range for {rows} placements"
            )));
        }
    };
    let mut slots = vec![ScheduleSlot::new(); len];
    for (index, courses) in by_slot {
        slots[index] = ScheduleSlot::with_courses(courses);
    }
    ScheduleSnapshot::new(Schedule::from_slots(slots), tests_per_day)
}
