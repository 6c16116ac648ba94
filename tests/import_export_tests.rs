use finals_schedule::persistence::{
    ScheduleSnapshot, load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv,
    save_schedule_to_json,
};
use finals_schedule::{CourseCode, Schedule, ScheduleError, ScheduleSlot};
use std::fs;
use tempfile::NamedTempFile;

fn slot(codes: &[&str]) -> ScheduleSlot {
    ScheduleSlot::with_courses(codes.iter().map(|c| CourseCode::from_section(c)).collect())
}

fn build_sample_snapshot() -> ScheduleSnapshot {
    let schedule = Schedule::from_slots(vec![
        slot(&["MATH 120", "BIO 101"]),
        slot(&["NURS 417"]),
        ScheduleSlot::new(),
        ScheduleSlot::new(),
        slot(&["CHEM 111"]),
    ]);
    ScheduleSnapshot::new(schedule, 2).unwrap()
}

#[test]
fn json_round_trip_preserves_schedule() {
    let snapshot = build_sample_snapshot();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_json(&snapshot, file.path()).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();
    assert_eq!(loaded, snapshot);
}

#[test]
fn csv_keeps_vacant_slots_in_place() {
    let snapshot = build_sample_snapshot();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_csv(&snapshot, file.path()).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("slot,day,period,course"));
    assert_eq!(lines.next(), Some("0,1,1,BIO 101"));
    assert!(text.contains("4,3,1,CHEM 111"));

    let loaded = load_schedule_from_csv(file.path(), 2).unwrap();
    assert_eq!(loaded.schedule.len(), 5);
    assert!(loaded.schedule.slot(2).unwrap().is_empty());
    assert_eq!(
        loaded.schedule.slot_of(&CourseCode::from_section("CHEM 111")),
        Some(4)
    );
}

#[test]
fn duplicate_course_is_rejected() {
    let schedule = Schedule::from_slots(vec![slot(&["BIO 101"]), slot(&["BIO 101"])]);
    assert!(matches!(
        ScheduleSnapshot::new(schedule, 4),
        Err(ScheduleError::InvalidInputFormat(_))
    ));
}

#[test]
fn zero_tests_per_day_is_rejected_on_load() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), r#"{"tests_per_day":0,"schedule":{"slots":[["BIO 101"]]}}"#).unwrap();
    assert!(matches!(
        load_schedule_from_json(file.path()),
        Err(ScheduleError::InvalidInputFormat(_))
    ));
}

#[test]
fn csv_without_rows_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "slot,day,period,course\n").unwrap();
    assert!(matches!(
        load_schedule_from_csv(file.path(), 4),
        Err(ScheduleError::InvalidInputFormat(_))
    ));
}

#[test]
fn csv_slot_index_out_of_range_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    for body in [
        "slot,day,period,course\n18446744073709551615,1,1,BIO 101\n",
        "slot,day,period,course\n100000000000,1,1,BIO 101\n",
        "slot,day,period,course\n0,1,1,BIO 101\n9,3,2,MATH 120\n",
    ] {
        fs::write(file.path(), body).unwrap();
        assert!(
            matches!(
                load_schedule_from_csv(file.path(), 4),
                Err(ScheduleError::InvalidInputFormat(_))
            ),
            "{body:?} should be rejected"
        );
    }

    fs::write(
        file.path(),
        "slot,day,period,course\n0,1,1,BIO 101\n7,2,4,MATH 120\n",
    )
    .unwrap();
    let loaded = load_schedule_from_csv(file.path(), 4).unwrap();
    assert_eq!(loaded.schedule.len(), 8);
}
