use crate::error::{ScheduleError, ScheduleResult};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Maps exam-day indices onto calendar dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamCalendar {
    first_day: NaiveDate,
    holidays: HashSet<NaiveDate>,
    non_working_days: HashSet<Weekday>,
}

impl ExamCalendar {
    /// Mon-Fri exam week with no holidays.
    pub fn new(first_day: NaiveDate) -> Self {
        Self {
            first_day,
            holidays: HashSet::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    /// Calendar with explicit working days and holidays.
    pub fn custom(
        first_day: NaiveDate,
        working_days: &[Weekday],
        holidays: &[NaiveDate],
    ) -> ScheduleResult<Self> {
        let mut calendar = Self::new(first_day);
        calendar.set_working_days(working_days)?;
        calendar.add_holidays(holidays);
        Ok(calendar)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    /// Replace the working week. At least one day is required or no exam
    /// could ever be dated.
    pub fn set_working_days(&mut self, days: &[Weekday]) -> ScheduleResult<()> {
        if days.is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "at least one working day is required".into(),
            ));
        }
        self.non_working_days = ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !days.contains(day))
            .collect();
        Ok(())
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.holidays.contains(&date) && !self.non_working_days.contains(&date.weekday())
    }

    /// First available date strictly after `from`.
    pub fn next_available(&self, from: NaiveDate) -> NaiveDate {
        let mut current = from + Duration::days(1);
        while !self.is_available(current) {
            current += Duration::days(1);
        }
        current
    }

    /// Date of exam day `day_index`, counting from the first available date
    /// on or after the first day.
    pub fn exam_date(&self, day_index: usize) -> NaiveDate {
        let mut current = if self.is_available(self.first_day) {
            self.first_day
        } else {
            self.next_available(self.first_day)
        };
        for _ in 0..day_index {
            current = self.next_available(current);
        }
        current
    }

    /// Side-panel labels such as `Mon Dec 8` for the first `count` exam days.
    pub fn day_labels(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|day| self.exam_date(day).format("%a %b %-d").to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekend_start_moves_to_monday() {
        let calendar = ExamCalendar::new(date(2025, 12, 6));
        assert_eq!(calendar.exam_date(0), date(2025, 12, 8));
    }

    #[test]
    fn empty_working_week_is_rejected() {
        let result = ExamCalendar::custom(date(2025, 12, 8), &[], &[]);
        assert!(matches!(result, Err(ScheduleError::InvalidConfig(_))));
    }
}
