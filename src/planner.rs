//! Next-event planning.
//!
//! Walks a trainee's ordered syllabus against their completed-event set
//! to find the event they should fly next, plus a lookahead candidate
//! for the opportunistic second wave.
//!
//! Pure function over the plan and the merged completion set (recorded
//! scores plus any ELCE inference); no side effects.

use std::collections::HashSet;

use crate::models::{Syllabus, SyllabusItem};

/// A trainee's next and next-plus-one syllabus events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextEvents<'a> {
    /// First eligible event in course order: not complete, schedulable,
    /// all prerequisites complete.
    pub next: Option<&'a SyllabusItem>,
    /// First schedulable item after `next` in course order. Lookahead
    /// only: prerequisites are not checked here, the pipeline
    /// re-validates them when the plus-one wave is actually placed.
    pub plus_one: Option<&'a SyllabusItem>,
}

/// Computes a trainee's next events from their plan.
///
/// An empty plan yields neither event. If every remaining item is
/// complete or blocked, `next` is `None` and no plus-one is computed.
pub fn next_events<'a>(plan: &'a Syllabus, completed: &HashSet<String>) -> NextEvents<'a> {
    let mut found = NextEvents::default();

    let mut next_index = None;
    for (i, item) in plan.items.iter().enumerate() {
        if completed.contains(&item.code) || !item.schedulable {
            continue;
        }
        if item.prerequisites.iter().all(|p| completed.contains(p)) {
            found.next = Some(item);
            next_index = Some(i);
            break;
        }
    }

    if let Some(i) = next_index {
        found.plus_one = plan.items[i + 1..].iter().find(|item| item.schedulable);
    }

    found
}

/// Merges recorded completions with an optional inferred one.
pub fn merged_completions(
    scored: &HashSet<String>,
    elce_code: Option<&str>,
) -> HashSet<String> {
    let mut completed = scored.clone();
    if let Some(code) = elce_code {
        completed.insert(code.to_string());
    }
    completed
}
