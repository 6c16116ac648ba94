use crate::course::{CourseCode, EnrollmentRecord, StudentId, Timeslot};
use crate::enrollment::{COURSE, COURSE_SECTION, SID, TIME_SLOT};
use crate::error::ScheduleResult;
use polars::prelude::*;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Lookup structures derived from the cleaned enrollment rows.
#[derive(Debug, Clone, Default)]
pub struct Relations {
    course_timeslot: HashMap<CourseCode, Timeslot>,
    course_roster: HashMap<CourseCode, HashSet<StudentId>>,
    popularity_order: Vec<CourseCode>,
}

impl Relations {
    /// Build relations from rows in table order.
    ///
    /// The first timeslot seen for a course wins. Popularity order is by
    /// distinct roster size, largest first, ties kept in encounter order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = EnrollmentRecord>,
    {
        let mut course_timeslot: HashMap<CourseCode, Timeslot> = HashMap::new();
        let mut course_roster: HashMap<CourseCode, HashSet<StudentId>> = HashMap::new();
        let mut encounter_order: Vec<CourseCode> = Vec::new();
        let mut inconsistent: HashSet<CourseCode> = HashSet::new();

        for record in records {
            let course = record.course();
            match course_timeslot.get(&course) {
                Some(existing) => {
                    if *existing != record.timeslot && inconsistent.insert(course.clone()) {
                        warn!(
                            course = %course,
                            kept = %existing,
                            ignored = %record.timeslot,
                            "course has more than one timeslot; keeping the first"
                        );
                    }
                }
                None => {
                    course_timeslot.insert(course.clone(), record.timeslot.clone());
                    encounter_order.push(course.clone());
                }
            }
            course_roster.entry(course).or_default().insert(record.student);
        }

        let mut popularity_order = encounter_order;
        popularity_order.sort_by_key(|course| Reverse(course_roster[course].len()));

        info!(courses = popularity_order.len(), "built course relations");
        Self {
            course_timeslot,
            course_roster,
            popularity_order,
        }
    }

    pub fn timeslot(&self, course: &CourseCode) -> Option<&Timeslot> {
        self.course_timeslot.get(course)
    }

    pub fn roster(&self, course: &CourseCode) -> Option<&HashSet<StudentId>> {
        self.course_roster.get(course)
    }

    pub fn roster_size(&self, course: &CourseCode) -> usize {
        self.roster(course).map_or(0, HashSet::len)
    }

    /// Processing order for the allocator.
    pub fn popularity_order(&self) -> &[CourseCode] {
        &self.popularity_order
    }

    pub fn len(&self) -> usize {
        self.popularity_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popularity_order.is_empty()
    }
}

/// Reads a cleaned enrollment frame into [`Relations`].
pub struct RelationBuilder<'a> {
    df: &'a DataFrame,
}

impl<'a> RelationBuilder<'a> {
    pub fn new(df: &'a DataFrame) -> Self {
        Self { df }
    }

    pub fn build(&self) -> ScheduleResult<Relations> {
        let sids = self.string_column(SID)?;
        let slots = self.string_column(TIME_SLOT)?;
        // Frames straight from the loader have no course column yet.
        let sections = match self.df.column(COURSE) {
            Ok(_) => self.string_column(COURSE)?,
            Err(_) => self.string_column(COURSE_SECTION)?,
        };

        let records = sids
            .str()?
            .into_iter()
            .zip(sections.str()?)
            .zip(slots.str()?)
            .filter_map(|((sid, section), slot)| match (sid, section, slot) {
                (Some(sid), Some(section), Some(slot)) => {
                    Some(EnrollmentRecord::new(sid, section, slot))
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        Ok(Relations::from_records(records))
    }

    fn string_column(&self, name: &str) -> PolarsResult<Column> {
        self.df.column(name)?.cast(&DataType::String)
    }
}
