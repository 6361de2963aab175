//! Resource line allocation.
//!
//! `LineBoard` is the growing set of events already placed in the
//! current build, owned exclusively by the pipeline. It answers the
//! allocation questions every stage asks: which line is free for this
//! interval, where is the earliest slot inside a window, and which
//! standby line absorbs an overflow event.
//!
//! Lines in a family are numbered from 1 ("FTD 1", "FTD 2", ...) and
//! allocation is lowest-number first fit. Standby packing is unbounded
//! first fit with no type separation: any flight, FTD or CPT event may
//! land on any standby line provided no time collision.
//!
//! Complexity is O(lines x occupants) per placement, which is fine at
//! daily event counts (tens, not thousands).

use crate::models::{FlyingWindow, ScheduleEvent, TIME_EPSILON};

/// Placed-event accumulator with first-fit line allocation.
#[derive(Debug, Clone, Default)]
pub struct LineBoard {
    events: Vec<ScheduleEvent>,
}

impl LineBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events placed so far, in placement order.
    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    /// Consumes the board, yielding the day's event list.
    pub fn into_events(self) -> Vec<ScheduleEvent> {
        self.events
    }

    /// Number of placed events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been placed.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Appends an event. Callers must have verified the fit; every
    /// pipeline placement goes through one of the queries below first.
    pub fn place(&mut self, event: ScheduleEvent) {
        self.events.push(event);
    }

    /// Whether a named line is free over [start, end).
    pub fn line_free(&self, resource_id: &str, start: f64, end: f64) -> bool {
        !self
            .events
            .iter()
            .any(|e| e.resource_id == resource_id && e.overlaps(start, end))
    }

    /// Lowest-numbered line in a bounded family free over the interval.
    pub fn first_free_line(
        &self,
        prefix: &str,
        line_count: usize,
        start: f64,
        duration_hours: f64,
    ) -> Option<String> {
        let end = start + duration_hours;
        (1..=line_count)
            .map(|n| format!("{prefix} {n}"))
            .find(|line| self.line_free(line, start, end))
    }

    /// Lowest-numbered standby line with no collision, growing the
    /// family as needed. Always succeeds.
    pub fn standby_line(&self, prefix: &str, start: f64, duration_hours: f64) -> String {
        let end = start + duration_hours;
        let mut number = 1;
        loop {
            let line = format!("{prefix} {number}");
            if self.line_free(&line, start, end) {
                return line;
            }
            number += 1;
        }
    }

    /// Earliest (start, line) fit inside a window, at or after
    /// `not_before`, scanning start times on a fixed increment.
    pub fn earliest_slot(
        &self,
        prefix: &str,
        line_count: usize,
        window: &FlyingWindow,
        duration_hours: f64,
        not_before: f64,
        increment: f64,
    ) -> Option<(f64, String)> {
        if line_count == 0 || increment <= 0.0 {
            return None;
        }

        let mut start = window.start.max(not_before);
        while start + duration_hours <= window.end + TIME_EPSILON {
            if let Some(line) = self.first_free_line(prefix, line_count, start, duration_hours) {
                return Some((start, line));
            }
            start += increment;
        }
        None
    }

    /// Whether a person is free over [start, end) in every seat.
    pub fn person_free(&self, name: &str, start: f64, end: f64) -> bool {
        !self
            .events
            .iter()
            .any(|e| e.occupies(name) && e.overlaps(start, end))
    }

    /// Hours already committed by an instructor this build.
    pub fn committed_hours(&self, instructor: &str) -> f64 {
        self.events
            .iter()
            .filter(|e| e.instructor.as_deref() == Some(instructor))
            .map(|e| e.duration_hours)
            .sum()
    }

    /// Finds a trainee's placed event with a given code.
    pub fn find_for_trainee(&self, trainee: &str, code: &str) -> Option<&ScheduleEvent> {
        self.events
            .iter()
            .find(|e| e.event_code == code && e.involves(trainee))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn event(id: &str, resource: &str, start: f64, duration: f64) -> ScheduleEvent {
        ScheduleEvent::new(id, date(), "BGF2", EventType::Flight, start, duration)
            .with_resource(resource)
    }

    #[test]
    fn test_first_free_line_lowest_number() {
        let mut board = LineBoard::new();
        board.place(event("E1", "FTD 1", 9.0, 1.0));

        let line = board.first_free_line("FTD", 2, 9.5, 1.0).unwrap();
        assert_eq!(line, "FTD 2");

        // Line 1 frees up after 1000.
        let line = board.first_free_line("FTD", 2, 10.0, 1.0).unwrap();
        assert_eq!(line, "FTD 1");
    }

    #[test]
    fn test_family_exhausted() {
        let mut board = LineBoard::new();
        board.place(event("E1", "FTD 1", 9.0, 2.0));
        board.place(event("E2", "FTD 2", 9.0, 2.0));
        assert!(board.first_free_line("FTD", 2, 9.5, 1.0).is_none());
    }

    #[test]
    fn test_standby_packing() {
        let mut board = LineBoard::new();
        board.place(event("E1", "STBY 1", 9.5, 1.0));

        // 0900-1000 collides with STBY 1 occupied 0930-1030.
        assert_eq!(board.standby_line("STBY", 9.0, 1.0), "STBY 2");
        // Back-to-back on the same line is fine (half-open intervals).
        assert_eq!(board.standby_line("STBY", 10.5, 1.0), "STBY 1");
    }

    #[test]
    fn test_standby_grows_unbounded() {
        let mut board = LineBoard::new();
        for n in 1..=5 {
            board.place(event(&format!("E{n}"), &format!("STBY {n}"), 9.0, 2.0));
        }
        assert_eq!(board.standby_line("STBY", 9.5, 1.0), "STBY 6");
    }

    #[test]
    fn test_earliest_slot_scans_forward() {
        let mut board = LineBoard::new();
        board.place(event("E1", "PC-21 1", 8.0, 2.0));

        let window = FlyingWindow::new(8.0, 16.0);
        // One line only: first fit is after the occupant ends.
        let (start, line) = board
            .earliest_slot("PC-21", 1, &window, 1.5, 8.0, 0.25)
            .unwrap();
        assert!((start - 10.0).abs() < 1e-9);
        assert_eq!(line, "PC-21 1");
    }

    #[test]
    fn test_earliest_slot_respects_not_before() {
        let board = LineBoard::new();
        let window = FlyingWindow::new(8.0, 16.0);
        let (start, _) = board
            .earliest_slot("PC-21", 1, &window, 1.0, 11.0, 0.25)
            .unwrap();
        assert!((start - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_earliest_slot_window_exhausted() {
        let board = LineBoard::new();
        let window = FlyingWindow::new(8.0, 10.0);
        assert!(board
            .earliest_slot("PC-21", 1, &window, 3.0, 8.0, 0.25)
            .is_none());
        assert!(board
            .earliest_slot("PC-21", 0, &window, 1.0, 8.0, 0.25)
            .is_none());
    }

    #[test]
    fn test_slot_ending_on_window_boundary_accepted() {
        let board = LineBoard::new();
        let window = FlyingWindow::new(8.0, 16.0);
        let (start, _) = board
            .earliest_slot("PC-21", 1, &window, 1.5, 14.5, 0.25)
            .unwrap();
        assert!((start - 14.5).abs() < 1e-9);
    }

    #[test]
    fn test_person_free_and_committed_hours() {
        let mut board = LineBoard::new();
        board.place(
            event("E1", "PC-21 1", 9.0, 1.5)
                .with_student("BLOGGS")
                .with_instructor("SMITH"),
        );

        assert!(!board.person_free("BLOGGS", 10.0, 11.0));
        assert!(!board.person_free("SMITH", 10.0, 11.0));
        assert!(board.person_free("BLOGGS", 10.5, 11.5));
        assert!((board.committed_hours("SMITH") - 1.5).abs() < 1e-10);
        assert_eq!(board.committed_hours("JONES"), 0.0);
    }

    #[test]
    fn test_find_for_trainee() {
        let mut board = LineBoard::new();
        board.place(event("E1", "PC-21 1", 9.0, 1.5).with_student("BLOGGS"));

        assert!(board.find_for_trainee("BLOGGS", "BGF2").is_some());
        assert!(board.find_for_trainee("BLOGGS", "BGF3").is_none());
        assert!(board.find_for_trainee("CITIZEN", "BGF2").is_none());
    }

    #[test]
    fn test_no_overlap_invariant_on_allocated_lines() {
        // Alternating queries and placements never produce an overlap.
        let mut board = LineBoard::new();
        let requests = [(9.0, 1.5), (9.5, 1.0), (10.0, 0.75), (9.25, 2.0)];
        for (i, &(start, dur)) in requests.iter().enumerate() {
            let line = board.standby_line("STBY", start, dur);
            board.place(event(&format!("E{i}"), &line, start, dur));
        }

        let events = board.events();
        for a in events {
            for b in events {
                if a.id != b.id && a.resource_id == b.resource_id {
                    assert!(!a.overlaps(b.start_time, b.end_time()));
                }
            }
        }
    }
}
