//! Availability timeline model.
//!
//! Aircraft (or simulator) availability over a day is recorded as a
//! sequence of step changes: at `timestamp`, the available count becomes
//! `count` and holds until the next change. The timeline is consumed
//! read-only by the availability engine; timestamps must be strictly
//! increasing, which input validation enforces before a build starts.

use serde::{Deserialize, Serialize};

/// A single step change in resource availability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityChange {
    /// Time of day the change takes effect (decimal hours).
    pub timestamp: f64,
    /// Number of units available from this time onward.
    pub count: u32,
}

impl AvailabilityChange {
    /// Creates a new step change.
    pub fn new(timestamp: f64, count: u32) -> Self {
        Self { timestamp, count }
    }
}

/// An ordered sequence of availability step changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityTimeline {
    /// Step changes in timestamp order.
    pub changes: Vec<AvailabilityChange>,
}

impl AvailabilityTimeline {
    /// Creates an empty timeline (no recorded availability).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a timeline from a list of changes, preserving order.
    pub fn from_changes(changes: Vec<AvailabilityChange>) -> Self {
        Self { changes }
    }

    /// Adds a step change.
    pub fn with_change(mut self, timestamp: f64, count: u32) -> Self {
        self.changes.push(AvailabilityChange::new(timestamp, count));
        self
    }

    /// Whether timestamps are strictly increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        self.changes
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp)
    }

    /// Returns the first out-of-order timestamp, if any.
    pub fn first_unordered_timestamp(&self) -> Option<f64> {
        self.changes
            .windows(2)
            .find(|pair| pair[0].timestamp >= pair[1].timestamp)
            .map(|pair| pair[1].timestamp)
    }

    /// Availability in effect at a time of day.
    ///
    /// Carries forward the last change at or before `time`. Returns 0 if
    /// no change precedes `time`.
    pub fn value_at(&self, time: f64) -> u32 {
        self.changes
            .iter()
            .filter(|c| c.timestamp <= time)
            .next_back()
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Whether the timeline has no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
