//! Flying window model.
//!
//! A flying window is the portion of the day during which a line family
//! (day flying, night flying) may be programmed.
//!
//! # Time Model
//! All times of day are decimal hours (e.g. 8.0 = 0800, 12.5 = 1230),
//! matching the convention used on the published program. Intervals are
//! half-open: a window includes its start and excludes its end.

use serde::{Deserialize, Serialize};

/// A time-of-day interval [start, end) in decimal hours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlyingWindow {
    /// Window start (decimal hours, inclusive).
    pub start: f64,
    /// Window end (decimal hours, exclusive).
    pub end: f64,
}

impl FlyingWindow {
    /// Creates a new flying window.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window length in hours.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        self.end - self.start
    }

    /// Whether a time of day falls within this window.
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether an interval [start, end) fits entirely inside this window.
    pub fn fits(&self, start: f64, duration_hours: f64) -> bool {
        start >= self.start && start + duration_hours <= self.end + TIME_EPSILON
    }

    /// Whether two windows overlap (strict half-open intersection).
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Tolerance for comparing decimal-hour times.
///
/// Slot searches step in fractional increments; accumulated float error
/// must not reject an interval that ends exactly on a window boundary.
pub const TIME_EPSILON: f64 = 1e-9;

/// Strict half-open interval intersection test for two [start, end) pairs.
#[inline]
pub fn intervals_overlap(s1: f64, e1: f64, s2: f64, e2: f64) -> bool {
    s1 < e2 && s2 < e1
}
