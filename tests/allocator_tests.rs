use finals_schedule::allocator::{DAILY_EXAM_CAP, SlotAllocator};
use finals_schedule::validation::{Finding, verify};
use finals_schedule::{CourseCode, EnrollmentRecord, Relations, Schedule};
use std::collections::HashMap;
use std::num::NonZeroUsize;

fn per_day(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn code(c: &str) -> CourseCode {
    CourseCode::from_section(c)
}

fn enroll(records: &mut Vec<EnrollmentRecord>, section: &str, slot: &str, students: impl IntoIterator<Item = String>) {
    for sid in students {
        records.push(EnrollmentRecord::new(&sid, section, slot));
    }
}

/// Twelve courses over six natural timeslots. Every student takes three
/// courses whose timeslots differ.
fn consistent_relations() -> Relations {
    let mut records = Vec::new();
    for student in 0..60 {
        for offset in [0, 1, 3] {
            let course = (student + offset) % 12;
            records.push(EnrollmentRecord::new(
                &format!("S{student:03}"),
                &format!("C {}-01", 100 + course),
                &format!("T{}", course % 6),
            ));
        }
    }
    Relations::from_records(records)
}

#[test]
fn disjoint_rosters_share_the_first_slot() {
    let mut records = Vec::new();
    enroll(&mut records, "A 100-01", "T1", (0..50).map(|i| format!("s{i}")));
    enroll(&mut records, "B 100-01", "T1", (50..80).map(|i| format!("s{i}")));
    enroll(&mut records, "C 100-01", "T2", (80..90).map(|i| format!("s{i}")));
    let relations = Relations::from_records(records);

    let state = SlotAllocator::new(&relations, per_day(4)).allocate();
    assert_eq!(state.schedule.len(), 1);
    assert_eq!(
        state.schedule.slot(0).unwrap().courses(),
        &[code("A 100"), code("B 100"), code("C 100")]
    );
}

#[test]
fn courses_sharing_a_student_get_separate_slots() {
    let mut records = Vec::new();
    for (i, course) in ["A 1", "B 1", "C 1", "D 1", "E 1"].iter().enumerate() {
        let others = (0..(5 - i)).map(move |n| format!("{course}-student{n}"));
        enroll(
            &mut records,
            &format!("{course}-01"),
            &format!("T{i}"),
            std::iter::once("shared".to_string()).chain(others),
        );
    }
    let relations = Relations::from_records(records);

    let schedule = SlotAllocator::new(&relations, per_day(4)).allocate().schedule;
    let populated: Vec<usize> = schedule.populated_slots().map(|(i, _)| i).collect();
    assert_eq!(populated.len(), 5);
    assert!(schedule.populated_slots().all(|(_, slot)| slot.len() == 1));
    // Two exams a day for the shared student leaves periods 3 and 4 vacant.
    assert_eq!(populated, vec![0, 1, 4, 5, 8]);
    assert_eq!(schedule.len(), 9);
}

#[test]
fn allocation_is_deterministic() {
    let relations = consistent_relations();
    let first = SlotAllocator::new(&relations, per_day(3)).allocate();
    let second = SlotAllocator::new(&relations, per_day(3)).allocate();
    assert_eq!(first.schedule, second.schedule);
    assert_eq!(first.daily_load, second.daily_load);
}

#[test]
fn every_course_is_placed_exactly_once() {
    let relations = consistent_relations();
    let schedule = SlotAllocator::new(&relations, per_day(3)).allocate().schedule;
    assert_eq!(schedule.course_count(), relations.len());
    for course in relations.popularity_order() {
        let holding = schedule
            .slots()
            .iter()
            .filter(|slot| slot.contains(course))
            .count();
        assert_eq!(holding, 1, "{course} placed {holding} times");
    }
}

#[test]
fn no_student_sits_more_than_two_exams_a_day() {
    let relations = consistent_relations();
    let schedule = SlotAllocator::new(&relations, per_day(4)).allocate().schedule;
    let mut load: HashMap<(usize, String), u32> = HashMap::new();
    for (index, slot) in schedule.populated_slots() {
        for course in slot.courses() {
            for student in relations.roster(course).unwrap() {
                *load.entry((index / 4, student.to_string())).or_insert(0) += 1;
            }
        }
    }
    assert!(load.values().all(|&exams| exams <= DAILY_EXAM_CAP));
}

#[test]
fn consistent_enrollment_verifies_clean() {
    let relations = consistent_relations();
    let schedule = SlotAllocator::new(&relations, per_day(4)).allocate().schedule;
    let report = verify(&schedule, &relations, per_day(4), 100);
    assert!(report.is_clean(), "{:?}", report.findings());
}

#[test]
fn same_time_courses_with_shared_students_are_flagged() {
    let relations = Relations::from_records(vec![
        EnrollmentRecord::new("1", "A 1-01", "T1"),
        EnrollmentRecord::new("2", "A 1-01", "T1"),
        EnrollmentRecord::new("1", "B 1-01", "T1"),
    ]);
    let schedule = SlotAllocator::new(&relations, per_day(4)).allocate().schedule;
    assert_eq!(schedule.len(), 1);
    let report = verify(&schedule, &relations, per_day(4), 4);
    assert!(report.findings().iter().any(|f| matches!(
        f,
        Finding::DoubleBooking { shared_students: 1, .. }
    )));
}

#[test]
fn empty_relations_give_empty_schedule() {
    let relations = Relations::default();
    let state = SlotAllocator::new(&relations, per_day(4)).allocate();
    assert_eq!(state.schedule, Schedule::new());
    assert!(state.daily_load.is_empty());
}
