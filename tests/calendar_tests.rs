use chrono::{Datelike, NaiveDate, Weekday};
use finals_schedule::calendar::ExamCalendar;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_calendar_weekends_unavailable() {
    let cal = ExamCalendar::new(date(2025, 12, 8));
    // 2025-12-13 is a Saturday, 2025-12-14 is a Sunday
    assert!(!cal.is_available(date(2025, 12, 13)));
    assert!(!cal.is_available(date(2025, 12, 14)));
    assert!(cal.is_available(date(2025, 12, 12)));
}

#[test]
fn next_available_skips_weekend() {
    let cal = ExamCalendar::new(date(2025, 12, 8));
    let next = cal.next_available(date(2025, 12, 12));
    assert_eq!(next.weekday(), Weekday::Mon);
    assert_eq!(next, date(2025, 12, 15));
}

#[test]
fn exam_dates_skip_holidays() {
    let cal = ExamCalendar::custom(
        date(2025, 12, 8),
        &[Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        &[date(2025, 12, 9)],
    )
    .unwrap();
    assert_eq!(cal.exam_date(0), date(2025, 12, 8));
    assert_eq!(cal.exam_date(1), date(2025, 12, 10));
    assert_eq!(cal.exam_date(4), date(2025, 12, 15));
}

#[test]
fn saturday_exams_when_configured() {
    let cal = ExamCalendar::custom(
        date(2025, 12, 11),
        &[
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ],
        &[],
    )
    .unwrap();
    assert_eq!(cal.exam_date(2), date(2025, 12, 13));
    assert_eq!(cal.exam_date(3), date(2025, 12, 15));
}

#[test]
fn day_labels_use_short_dates() {
    let cal = ExamCalendar::new(date(2025, 12, 8));
    assert_eq!(
        cal.day_labels(3),
        vec!["Mon Dec 8", "Tue Dec 9", "Wed Dec 10"]
    );
}
