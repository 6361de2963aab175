//! Time-weighted availability over a flying window.
//!
//! Aircraft availability is recorded as step changes; line planning needs
//! a single figure for the window, so the engine partitions the window
//! into maximal constant-value segments and takes the duration-weighted
//! mean. The value in force at window start is carried forward from the
//! last change at or before it.
//!
//! # Example
//! Window 0800-1600 with changes {0800: 10, 1200: 20} averages
//! (10 x 4 + 20 x 4) / 8 = 15.

use crate::models::{AvailabilityTimeline, FlyingWindow};

/// A maximal constant-availability segment of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    start: f64,
    end: f64,
    count: u32,
}

impl Segment {
    fn weighted_hours(&self) -> f64 {
        self.count as f64 * (self.end - self.start)
    }
}

/// Computes the time-weighted average availability across a window.
///
/// # Degenerate cases
/// - Empty timeline: 0.
/// - Every change before the window: the most recent value holds for the
///   whole window.
/// - Every change after the window: no value is ever in force, so 0.
/// - Zero-length window: 0.
pub fn average_availability(window: &FlyingWindow, timeline: &AvailabilityTimeline) -> f64 {
    if timeline.is_empty() || window.duration_hours() <= 0.0 {
        return 0.0;
    }

    let segments = segments_in_window(window, timeline);
    let weighted: f64 = segments.iter().map(Segment::weighted_hours).sum();
    weighted / window.duration_hours()
}

/// Splits the window into constant-value segments.
///
/// Assumes the timeline passed input validation (strictly increasing
/// timestamps).
fn segments_in_window(window: &FlyingWindow, timeline: &AvailabilityTimeline) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = window.start;
    let mut current = timeline.value_at(window.start);

    for change in &timeline.changes {
        if change.timestamp > cursor && change.timestamp < window.end {
            segments.push(Segment {
                start: cursor,
                end: change.timestamp,
                count: current,
            });
            cursor = change.timestamp;
            current = change.count;
        }
    }

    if cursor < window.end {
        segments.push(Segment {
            start: cursor,
            end: window.end,
            count: current,
        });
    }

    segments
}

/// Parses a clock string into decimal hours ("0930" -> 9.5).
///
/// Non-digit characters are stripped first, so "09:30" parses the same.
/// Four digits are read as HHMM; anything else falls back to a plain
/// decimal parse, and unparseable input yields 0.
pub fn parse_clock(text: &str) -> f64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        let hours: f64 = digits[..2].parse().unwrap_or(0.0);
        let minutes: f64 = digits[2..].parse().unwrap_or(0.0);
        return hours + minutes / 60.0;
    }
    text.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AvailabilityTimeline;

    fn window(start: f64, end: f64) -> FlyingWindow {
        FlyingWindow::new(start, end)
    }

    #[test]
    fn test_worked_example() {
        // 10 aircraft 0800-1200, 20 aircraft 1200-1600 -> average 15
        let timeline = AvailabilityTimeline::new()
            .with_change(8.0, 10)
            .with_change(12.0, 20);

        let avg = average_availability(&window(8.0, 16.0), &timeline);
        assert!((avg - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_single_change_at_start_is_exact() {
        let timeline = AvailabilityTimeline::new().with_change(8.0, 7);

        // Any sub-window at or after the change averages exactly 7.
        assert!((average_availability(&window(8.0, 16.0), &timeline) - 7.0).abs() < 1e-10);
        assert!((average_availability(&window(10.0, 11.5), &timeline) - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = AvailabilityTimeline::new();
        assert_eq!(average_availability(&window(8.0, 16.0), &timeline), 0.0);
    }

    #[test]
    fn test_all_changes_before_window() {
        // Last preceding value holds for the whole window.
        let timeline = AvailabilityTimeline::new()
            .with_change(5.0, 4)
            .with_change(6.0, 12);

        let avg = average_availability(&window(8.0, 16.0), &timeline);
        assert!((avg - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_all_changes_after_window() {
        let timeline = AvailabilityTimeline::new().with_change(18.0, 12);
        assert_eq!(average_availability(&window(8.0, 16.0), &timeline), 0.0);
    }

    #[test]
    fn test_change_mid_window_without_start_value() {
        // Nothing in force until 1200, then 10 until 1600.
        let timeline = AvailabilityTimeline::new().with_change(12.0, 10);

        let avg = average_availability(&window(8.0, 16.0), &timeline);
        assert!((avg - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_change_on_window_end_ignored() {
        let timeline = AvailabilityTimeline::new()
            .with_change(8.0, 10)
            .with_change(16.0, 99);

        let avg = average_availability(&window(8.0, 16.0), &timeline);
        assert!((avg - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_length_window() {
        let timeline = AvailabilityTimeline::new().with_change(8.0, 10);
        assert_eq!(average_availability(&window(12.0, 12.0), &timeline), 0.0);
    }

    #[test]
    fn test_parse_clock() {
        assert!((parse_clock("0800") - 8.0).abs() < 1e-10);
        assert!((parse_clock("0930") - 9.5).abs() < 1e-10);
        assert!((parse_clock("12:30") - 12.5).abs() < 1e-10);
        assert!((parse_clock("8.25") - 8.25).abs() < 1e-10);
        assert_eq!(parse_clock("not a time"), 0.0);
    }
}
