pub mod allocator;
pub mod calendar;
pub mod config;
pub mod course;
pub mod enrollment;
pub mod error;
pub mod persistence;
pub mod pipeline;
pub mod preprocess;
pub mod relations;
pub mod render;
pub mod schedule;
pub mod validation;

pub use allocator::{AllocationState, SlotAllocator, StudentDailyLoad};
pub use calendar::ExamCalendar;
pub use config::SchedulerConfig;
pub use course::{CourseCode, EnrollmentRecord, StudentId, Timeslot};
pub use error::{ScheduleError, ScheduleResult};
pub use preprocess::{CourseSelection, ExclusionPatterns};
pub use relations::{RelationBuilder, Relations};
pub use render::RenderOptions;
pub use schedule::{Schedule, ScheduleSlot, SlotPosition};
pub use validation::{Finding, VerificationReport};
