//! Domain models for the Daily Flying Program build.
//!
//! Provides the core data types a build consumes and produces: syllabus
//! items and plans, scheduled events, personnel, flying windows, and
//! availability timelines. All types are immutable during a build except
//! `ScheduleEvent`, which the pipeline constructs and owns until the
//! day's list is emitted.
//!
//! # Time Model
//! Times of day are decimal hours (8.0 = 0800, 12.5 = 1230); program
//! dates are `chrono::NaiveDate`. Intervals are half-open [start, end).

mod event;
mod personnel;
mod syllabus;
mod timeline;
mod window;

pub use event::{EventType, ScheduleEvent};
pub use personnel::{Instructor, Trainee};
pub use syllabus::{ItemKind, Period, Syllabus, SyllabusItem};
pub use timeline::{AvailabilityChange, AvailabilityTimeline};
pub use window::{intervals_overlap, FlyingWindow, TIME_EPSILON};
