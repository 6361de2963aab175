//! Effective Last Completed Event (ELCE) resolution.
//!
//! Score entry lags flying by up to a day: a trainee who flew this
//! morning may still show yesterday's event as their last completion.
//! ELCE bridges the gap by reading the previous day's published program
//! and treating the trainee's latest finished, not-cancelled,
//! not-unsuccessful event as complete for next-event computation. The
//! inferred completion is never written back as a score.
//!
//! This module is a pure query over a snapshot; the build instant is an
//! explicit parameter so a build is reproducible.

use chrono::{Days, NaiveDate};

use crate::models::ScheduleEvent;

/// An inferred completion for the current build.
#[derive(Debug, Clone, PartialEq)]
pub struct Elce {
    /// Event code treated as complete.
    pub event_code: String,
    /// Date the event was flown.
    pub event_date: NaiveDate,
    /// Start time of the event (decimal hours).
    pub start_time: f64,
}

/// Resolves a trainee's ELCE from the published schedule lookback.
///
/// Considers events dated exactly one day before `build_date`, plus any
/// build-day events the caller supplies (a mid-day rebuild may already
/// have flown events published), in which the trainee appears as
/// student or attendee, keeping those that have finished and were
/// neither cancelled nor unsuccessful. The latest wins, newer date
/// first, then start time; an exact tie falls back to the
/// lexicographically smallest event code.
///
/// A prior-day event has always finished by the build instant; the
/// `current_time` clock test only constrains events dated on the build
/// day itself.
pub fn effective_last_completed(
    trainee_name: &str,
    prior_day: &[ScheduleEvent],
    build_date: NaiveDate,
    current_time: f64,
) -> Option<Elce> {
    let lookback_date = build_date.checked_sub_days(Days::new(1))?;

    let candidates = prior_day.iter().filter(|e| {
        (e.date == lookback_date || e.date == build_date)
            && e.involves(trainee_name)
            && has_finished(e, build_date, current_time)
            && !e.is_cancelled
            && !e.is_unsuccessful
    });

    let best = candidates.reduce(|best, e| {
        let newer = e.date > best.date
            || (e.date == best.date
                && (e.start_time > best.start_time
                    || (e.start_time == best.start_time && e.event_code < best.event_code)));
        if newer {
            e
        } else {
            best
        }
    })?;

    log::info!(
        "ELCE for {trainee_name}: {} (flown {} at {:.2})",
        best.event_code,
        best.date,
        best.start_time
    );

    Some(Elce {
        event_code: best.event_code.clone(),
        event_date: best.date,
        start_time: best.start_time,
    })
}

fn has_finished(event: &ScheduleEvent, build_date: NaiveDate, current_time: f64) -> bool {
    event.date < build_date || event.end_time() < current_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;

    fn build_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn yesterday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn flight(id: &str, code: &str, start: f64) -> ScheduleEvent {
        ScheduleEvent::new(id, yesterday(), code, EventType::Flight, start, 1.5)
            .with_student("BLOGGS")
    }

    #[test]
    fn test_latest_finished_event_selected() {
        // Flew BGF2 yesterday 0930-1100, not scored yet; build at 0700.
        let prior = vec![flight("E1", "BGF1", 7.0), flight("E2", "BGF2", 9.5)];

        let elce = effective_last_completed("BLOGGS", &prior, build_date(), 7.0).unwrap();
        assert_eq!(elce.event_code, "BGF2");
        assert_eq!(elce.event_date, yesterday());
        assert!((elce.start_time - 9.5).abs() < 1e-10);
    }

    #[test]
    fn test_cancelled_never_selected() {
        let prior = vec![flight("E1", "BGF1", 7.0), flight("E2", "BGF2", 9.5).cancelled()];

        let elce = effective_last_completed("BLOGGS", &prior, build_date(), 7.0).unwrap();
        assert_eq!(elce.event_code, "BGF1");
    }

    #[test]
    fn test_unsuccessful_never_selected() {
        let prior = vec![flight("E1", "BGF2", 9.5).unsuccessful()];
        assert!(effective_last_completed("BLOGGS", &prior, build_date(), 7.0).is_none());
    }

    #[test]
    fn test_other_trainee_events_ignored() {
        let prior = vec![
            ScheduleEvent::new("E1", yesterday(), "BGF4", EventType::Flight, 10.0, 1.5)
                .with_student("CITIZEN"),
        ];
        assert!(effective_last_completed("BLOGGS", &prior, build_date(), 7.0).is_none());
    }

    #[test]
    fn test_attendee_counts_as_participation() {
        let prior = vec![
            ScheduleEvent::new("E1", yesterday(), "NAV3", EventType::Flight, 10.0, 1.5)
                .with_student("CITIZEN")
                .with_attendee("BLOGGS"),
        ];

        let elce = effective_last_completed("BLOGGS", &prior, build_date(), 7.0).unwrap();
        assert_eq!(elce.event_code, "NAV3");
    }

    #[test]
    fn test_wrong_date_ignored() {
        let two_days_ago = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
        let prior = vec![
            ScheduleEvent::new("E1", two_days_ago, "BGF2", EventType::Flight, 9.5, 1.5)
                .with_student("BLOGGS"),
        ];
        assert!(effective_last_completed("BLOGGS", &prior, build_date(), 7.0).is_none());
    }

    #[test]
    fn test_same_day_event_needs_clock() {
        // A build-day event only counts once ended.
        let mut e = flight("E1", "BGF2", 9.5);
        e.date = build_date();
        let prior = vec![e];
        assert!(effective_last_completed("BLOGGS", &prior, build_date(), 7.0).is_none());

        // Rebuilt after it landed, the same event is the ELCE.
        let mut e = flight("E1", "BGF2", 9.5);
        e.date = build_date();
        let elce = effective_last_completed("BLOGGS", &[e], build_date(), 11.5).unwrap();
        assert_eq!(elce.event_code, "BGF2");
        assert_eq!(elce.event_date, build_date());
    }

    #[test]
    fn test_same_day_finish_beats_earlier_prior_day_start() {
        // Flew BGF3 this morning 0600-0730; yesterday's BGF2 started
        // later in the day but the newer date wins.
        let mut today = flight("E1", "BGF3", 6.0);
        today.date = build_date();
        let prior = vec![flight("E2", "BGF2", 9.5), today];

        let elce = effective_last_completed("BLOGGS", &prior, build_date(), 8.0).unwrap();
        assert_eq!(elce.event_code, "BGF3");
    }

    #[test]
    fn test_start_time_tie_breaks_by_code() {
        let prior = vec![flight("E1", "IF2", 9.5), flight("E2", "BGF2", 9.5)];

        let elce = effective_last_completed("BLOGGS", &prior, build_date(), 7.0).unwrap();
        assert_eq!(elce.event_code, "BGF2");
    }

    #[test]
    fn test_empty_prior_day() {
        assert!(effective_last_completed("BLOGGS", &[], build_date(), 7.0).is_none());
    }
}
