//! Input integrity checks.
//!
//! A build runs from a snapshot fetched once at build start; these
//! checks run against that snapshot before stage 1 and any failure
//! aborts the build. Everything here is fatal by definition — expected
//! conditions (unplaceable candidates, empty plans) are report entries,
//! not errors.
//!
//! Checks:
//! - prerequisite graph is acyclic (DFS back-edge detection)
//! - availability timeline timestamps strictly increase
//! - fixed-time input events do not overlap on a shared resource

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::models::{AvailabilityTimeline, ScheduleEvent, Syllabus};

/// Fatal input defect; aborts the build with a diagnostic naming the
/// offending entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataIntegrityError {
    /// The prerequisite graph of a syllabus contains a cycle.
    #[error("cyclic prerequisite chain in {syllabus} involving '{code}'")]
    CyclicPrerequisites { syllabus: String, code: String },

    /// Availability change timestamps are not strictly increasing.
    #[error("availability timeline for '{resource}' is out of order at {timestamp}")]
    UnorderedTimeline { resource: String, timestamp: f64 },

    /// Two fixed-time input events overlap on the same resource.
    #[error("fixed-time events '{first}' and '{second}' overlap on '{resource}'")]
    FixedEventOverlap {
        resource: String,
        first: String,
        second: String,
    },
}

/// Validates that a syllabus' prerequisite edges form a DAG.
///
/// `label` names the syllabus in the diagnostic ("master syllabus",
/// "LMP for BLOGGS").
pub fn validate_syllabus(syllabus: &Syllabus, label: &str) -> Result<(), DataIntegrityError> {
    // prerequisite -> dependent item, over codes present in this plan
    let codes: HashSet<&str> = syllabus.items.iter().map(|i| i.code.as_str()).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for item in &syllabus.items {
        for prereq in &item.prerequisites {
            if codes.contains(prereq.as_str()) {
                adjacency
                    .entry(prereq.as_str())
                    .or_default()
                    .push(item.code.as_str());
            }
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();
    for &code in &codes {
        if !visited.contains(code) && has_cycle(code, &adjacency, &mut visited, &mut in_stack) {
            return Err(DataIntegrityError::CyclicPrerequisites {
                syllabus: label.to_string(),
                code: code.to_string(),
            });
        }
    }
    Ok(())
}

fn has_cycle<'a>(
    node: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(successors) = adjacency.get(node) {
        for &next in successors {
            if in_stack.contains(next) {
                return true;
            }
            if !visited.contains(next) && has_cycle(next, adjacency, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

/// Validates that a timeline's timestamps strictly increase.
pub fn validate_timeline(
    timeline: &AvailabilityTimeline,
    resource: &str,
) -> Result<(), DataIntegrityError> {
    match timeline.first_unordered_timestamp() {
        Some(timestamp) => Err(DataIntegrityError::UnorderedTimeline {
            resource: resource.to_string(),
            timestamp,
        }),
        None => Ok(()),
    }
}

/// Validates that fixed-time input events sharing a named resource do
/// not overlap.
///
/// Events with no resource binding are assigned lines by the build and
/// cannot conflict as input.
pub fn validate_fixed_events(events: &[ScheduleEvent]) -> Result<(), DataIntegrityError> {
    let fixed: Vec<&ScheduleEvent> = events
        .iter()
        .filter(|e| e.is_time_fixed && !e.resource_id.is_empty())
        .collect();

    for (i, a) in fixed.iter().enumerate() {
        for b in &fixed[i + 1..] {
            if a.resource_id == b.resource_id && a.overlaps(b.start_time, b.end_time()) {
                return Err(DataIntegrityError::FixedEventOverlap {
                    resource: a.resource_id.clone(),
                    first: a.event_code.clone(),
                    second: b.event_code.clone(),
                });
            }
        }
    }
    Ok(())
}
