//! Syllabus models.
//!
//! A syllabus is the ordered list of training events for a course. Each
//! trainee either follows the master syllabus or an individual Learning
//! Management Plan (LMP) override carrying the same item structure.
//! Items are loaded once per build and never mutated while building.
//!
//! Prerequisite edges between items form a DAG by construction; a cycle
//! is a data-integrity error caught by input validation, not a state the
//! planner has to tolerate.

use serde::{Deserialize, Serialize};

/// Which resource line family a syllabus item demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Live flying event (aircraft line).
    Flight,
    /// Flight Training Device (full simulator) event.
    Ftd,
    /// Cockpit Procedures Trainer event.
    Cpt,
    /// Ground-school event.
    Ground,
}

/// Day/night classification of a syllabus item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// Flown in the day flying window.
    Day,
    /// Flown in the night flying window (gated on BNF trainee numbers).
    Night,
}

/// One event in a course syllabus.
///
/// `schedulable` is resolved at load time: mass-brief ("MB") entries are
/// marked non-schedulable there, so scheduling logic never needs to
/// inspect event-code text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyllabusItem {
    /// Event code, unique within a syllabus (e.g. "BGF2").
    pub code: String,
    /// Event codes (ground and flying) that must be complete first.
    pub prerequisites: Vec<String>,
    /// Whether this item can occupy a resource line on its own.
    pub schedulable: bool,
    /// Position in course order.
    pub sequence_index: usize,
    /// Line family the item demands.
    pub kind: ItemKind,
    /// Day or night event.
    pub period: Period,
    /// Event duration in decimal hours.
    pub duration_hours: f64,
}

impl SyllabusItem {
    /// Creates a schedulable day-flight item with no prerequisites.
    pub fn new(code: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            code: code.into(),
            prerequisites: Vec::new(),
            schedulable: true,
            sequence_index,
            kind: ItemKind::Flight,
            period: Period::Day,
            duration_hours: 1.0,
        }
    }

    /// Sets the prerequisite event codes.
    pub fn with_prerequisites(mut self, prerequisites: Vec<String>) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    /// Adds a single prerequisite.
    pub fn with_prerequisite(mut self, code: impl Into<String>) -> Self {
        self.prerequisites.push(code.into());
        self
    }

    /// Sets the line family.
    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the day/night period.
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Sets the duration in hours.
    pub fn with_duration(mut self, hours: f64) -> Self {
        self.duration_hours = hours;
        self
    }

    /// Marks the item as a ground-brief entry that cannot hold a line.
    pub fn ground_brief(mut self) -> Self {
        self.schedulable = false;
        self
    }
}

/// An ordered course syllabus (master or individual LMP).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Syllabus {
    /// Items in course order.
    pub items: Vec<SyllabusItem>,
}

impl Syllabus {
    /// Creates an empty syllabus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a syllabus from items, preserving their order.
    pub fn from_items(items: Vec<SyllabusItem>) -> Self {
        Self { items }
    }

    /// Appends an item.
    pub fn with_item(mut self, item: SyllabusItem) -> Self {
        self.items.push(item);
        self
    }

    /// Looks up an item by event code.
    pub fn get(&self, code: &str) -> Option<&SyllabusItem> {
        self.items.iter().find(|i| i.code == code)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the syllabus has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
