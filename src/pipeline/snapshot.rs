//! Collaborator contracts and the build snapshot.
//!
//! The build core is storage-agnostic: everything it needs arrives
//! through the provider traits below, and all of it is materialized into
//! a `BuildSnapshot` once, before stage 1. The pipeline itself performs
//! no I/O; builds for different dates can run concurrently on their own
//! snapshots.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};

use crate::models::{
    AvailabilityTimeline, FlyingWindow, Instructor, ScheduleEvent, Syllabus, Trainee,
};

/// Supplies course syllabi and individual Learning Management Plans.
pub trait SyllabusProvider {
    /// The master syllabus, in course order.
    fn master_syllabus(&self) -> Syllabus;

    /// A trainee's individual plan override, if one exists.
    fn individual_plan(&self, trainee: &str) -> Option<Syllabus>;
}

/// Supplies recorded completions per trainee.
pub trait ScoreProvider {
    /// Event codes with an entered score for this trainee.
    fn completed_events(&self, trainee: &str) -> HashSet<String>;
}

/// Supplies published schedules and fixed-time commitments.
pub trait ScheduleProvider {
    /// The published program for a date (used for the ELCE lookback).
    fn published_schedule(&self, date: NaiveDate) -> Vec<ScheduleEvent>;

    /// Fixed-time priority events requested for a date (checkrides,
    /// standardization sorties); placed before flexible demand.
    fn priority_events(&self, date: NaiveDate) -> Vec<ScheduleEvent>;
}

/// Supplies availability step changes per resource and date.
pub trait AvailabilityProvider {
    /// Ordered availability changes for a resource on a date.
    fn changes(&self, resource: &str, date: NaiveDate) -> AvailabilityTimeline;
}

/// Supplies trainees and instructors with qualification flags.
pub trait PersonnelProvider {
    /// All trainees on strength.
    fn trainees(&self) -> Vec<Trainee>;

    /// All instructors on strength.
    fn instructors(&self) -> Vec<Instructor>;
}

/// Resource identifier used for the aircraft availability timeline.
pub const AIRCRAFT_RESOURCE: &str = "PC-21";

/// Everything one build reads, fetched up front.
#[derive(Debug, Clone)]
pub struct BuildSnapshot {
    /// The date being built.
    pub build_date: NaiveDate,
    /// Wall-clock time of day at build time (decimal hours); drives the
    /// ELCE finished test.
    pub current_time: f64,
    /// Day flying window.
    pub day_window: FlyingWindow,
    /// Night flying window.
    pub night_window: FlyingWindow,
    /// Trainees on strength.
    pub trainees: Vec<Trainee>,
    /// Instructors on strength.
    pub instructors: Vec<Instructor>,
    /// Master syllabus in course order.
    pub master_syllabus: Syllabus,
    /// Individual plan overrides by trainee name.
    pub individual_plans: HashMap<String, Syllabus>,
    /// Recorded completions by trainee name.
    pub scores: HashMap<String, HashSet<String>>,
    /// The previous day's published program (ELCE lookback).
    pub prior_day: Vec<ScheduleEvent>,
    /// Fixed-time priority events for the build date.
    pub priority_events: Vec<ScheduleEvent>,
    /// Aircraft availability step changes for the build date.
    pub aircraft_timeline: AvailabilityTimeline,
}

impl BuildSnapshot {
    /// Materializes a snapshot from the collaborator traits.
    pub fn assemble(
        syllabus: &impl SyllabusProvider,
        scores: &impl ScoreProvider,
        schedules: &impl ScheduleProvider,
        availability: &impl AvailabilityProvider,
        personnel: &impl PersonnelProvider,
        build_date: NaiveDate,
        current_time: f64,
        day_window: FlyingWindow,
        night_window: FlyingWindow,
    ) -> Self {
        let trainees = personnel.trainees();

        let mut individual_plans = HashMap::new();
        let mut score_sets = HashMap::new();
        for trainee in &trainees {
            if let Some(plan) = syllabus.individual_plan(&trainee.name) {
                individual_plans.insert(trainee.name.clone(), plan);
            }
            score_sets.insert(trainee.name.clone(), scores.completed_events(&trainee.name));
        }

        let prior_date = build_date
            .checked_sub_days(Days::new(1))
            .unwrap_or(build_date);

        Self {
            build_date,
            current_time,
            day_window,
            night_window,
            trainees,
            instructors: personnel.instructors(),
            master_syllabus: syllabus.master_syllabus(),
            individual_plans,
            scores: score_sets,
            prior_day: schedules.published_schedule(prior_date),
            priority_events: schedules.priority_events(build_date),
            aircraft_timeline: availability.changes(AIRCRAFT_RESOURCE, build_date),
        }
    }

    /// The plan a trainee follows: individual LMP if present, else the
    /// master syllabus.
    pub fn plan_for(&self, trainee: &str) -> &Syllabus {
        self.individual_plans
            .get(trainee)
            .unwrap_or(&self.master_syllabus)
    }

    /// Recorded completions for a trainee (empty set if none).
    pub fn scores_for(&self, trainee: &str) -> HashSet<String> {
        self.scores.get(trainee).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::parse_clock;
    use crate::models::SyllabusItem;

    struct FixedSyllabus;
    impl SyllabusProvider for FixedSyllabus {
        fn master_syllabus(&self) -> Syllabus {
            Syllabus::new().with_item(SyllabusItem::new("BGF1", 0))
        }
        fn individual_plan(&self, trainee: &str) -> Option<Syllabus> {
            (trainee == "BLOGGS")
                .then(|| Syllabus::new().with_item(SyllabusItem::new("RMD1", 0)))
        }
    }

    struct NoScores;
    impl ScoreProvider for NoScores {
        fn completed_events(&self, _trainee: &str) -> HashSet<String> {
            HashSet::new()
        }
    }

    struct NoSchedules;
    impl ScheduleProvider for NoSchedules {
        fn published_schedule(&self, _date: NaiveDate) -> Vec<ScheduleEvent> {
            Vec::new()
        }
        fn priority_events(&self, _date: NaiveDate) -> Vec<ScheduleEvent> {
            Vec::new()
        }
    }

    struct TenAircraft;
    impl AvailabilityProvider for TenAircraft {
        fn changes(&self, _resource: &str, _date: NaiveDate) -> AvailabilityTimeline {
            AvailabilityTimeline::new().with_change(8.0, 10)
        }
    }

    struct TwoTrainees;
    impl PersonnelProvider for TwoTrainees {
        fn trainees(&self) -> Vec<Trainee> {
            vec![
                Trainee::new("BLOGGS", "ADF240"),
                Trainee::new("CITIZEN", "ADF240"),
            ]
        }
        fn instructors(&self) -> Vec<Instructor> {
            vec![Instructor::new("SMITH").qfi()]
        }
    }

    #[test]
    fn test_assemble_and_plan_fallback() {
        let snapshot = BuildSnapshot::assemble(
            &FixedSyllabus,
            &NoScores,
            &NoSchedules,
            &TenAircraft,
            &TwoTrainees,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            parse_clock("0600"),
            FlyingWindow::new(parse_clock("0800"), parse_clock("1600")),
            FlyingWindow::new(parse_clock("1800"), parse_clock("2300")),
        );

        // BLOGGS has an LMP override; CITIZEN falls back to master.
        assert_eq!(snapshot.plan_for("BLOGGS").items[0].code, "RMD1");
        assert_eq!(snapshot.plan_for("CITIZEN").items[0].code, "BGF1");
        assert_eq!(snapshot.trainees.len(), 2);
        assert!(snapshot.scores_for("BLOGGS").is_empty());
        assert_eq!(snapshot.aircraft_timeline.changes.len(), 1);
    }
}
