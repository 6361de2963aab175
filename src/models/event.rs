//! Scheduled event model.
//!
//! A `ScheduleEvent` is one tile on the published program: an event code
//! placed on a named resource line for a time interval, with its
//! participants. Events are created by the build pipeline, which is the
//! sole writer during a build; once the day's list is emitted it is
//! treated as a value and replaced whole on the next publish.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::window::intervals_overlap;

/// Resource family of a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// Live flying event.
    Flight,
    /// Flight Training Device event.
    Ftd,
    /// Cockpit Procedures Trainer event.
    Cpt,
    /// Ground event (ground school, duty supervision).
    Ground,
}

/// One event on the Daily Flying Program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEvent {
    /// Unique event identifier within a build.
    pub id: String,
    /// Program date.
    pub date: NaiveDate,
    /// Resource line holding the event (e.g. "PC-21 3", "STBY 1").
    pub resource_id: String,
    /// Start time of day (decimal hours).
    pub start_time: f64,
    /// Duration in decimal hours.
    pub duration_hours: f64,
    /// Resource family.
    pub event_type: EventType,
    /// Syllabus or duty event code (e.g. "BGF2", "DUTY SUP").
    pub event_code: String,
    /// Primary trainee, if any.
    pub student: Option<String>,
    /// Additional attendees (e.g. back-seat trainees).
    pub attendees: Vec<String>,
    /// Assigned instructor, if any.
    pub instructor: Option<String>,
    /// Whether the event was cancelled after publication.
    pub is_cancelled: bool,
    /// Whether the event was flown but assessed unsuccessful.
    pub is_unsuccessful: bool,
    /// Whether the start time is a fixed commitment (checkride, duty).
    pub is_time_fixed: bool,
}

impl ScheduleEvent {
    /// Creates a new event with no participants or resource line.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        event_code: impl Into<String>,
        event_type: EventType,
        start_time: f64,
        duration_hours: f64,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            resource_id: String::new(),
            start_time,
            duration_hours,
            event_type,
            event_code: event_code.into(),
            student: None,
            attendees: Vec::new(),
            instructor: None,
            is_cancelled: false,
            is_unsuccessful: false,
            is_time_fixed: false,
        }
    }

    /// Sets the resource line.
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    /// Sets the primary trainee.
    pub fn with_student(mut self, student: impl Into<String>) -> Self {
        self.student = Some(student.into());
        self
    }

    /// Adds an attendee.
    pub fn with_attendee(mut self, attendee: impl Into<String>) -> Self {
        self.attendees.push(attendee.into());
        self
    }

    /// Sets the instructor.
    pub fn with_instructor(mut self, instructor: impl Into<String>) -> Self {
        self.instructor = Some(instructor.into());
        self
    }

    /// Marks the start time as fixed.
    pub fn time_fixed(mut self) -> Self {
        self.is_time_fixed = true;
        self
    }

    /// Marks the event cancelled.
    pub fn cancelled(mut self) -> Self {
        self.is_cancelled = true;
        self
    }

    /// Marks the event unsuccessful.
    pub fn unsuccessful(mut self) -> Self {
        self.is_unsuccessful = true;
        self
    }

    /// End time of day (decimal hours).
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration_hours
    }

    /// Whether this event's interval overlaps [start, end).
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        intervals_overlap(self.start_time, self.end_time(), start, end)
    }

    /// Whether a person participates as student or attendee.
    pub fn involves(&self, name: &str) -> bool {
        self.student.as_deref() == Some(name) || self.attendees.iter().any(|a| a == name)
    }

    /// Whether a person occupies this event in any seat.
    pub fn occupies(&self, name: &str) -> bool {
        self.involves(name) || self.instructor.as_deref() == Some(name)
    }
}
