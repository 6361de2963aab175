//! The Daily Flying Program build.
//!
//! A build is a single-threaded batch computation over one snapshot: it
//! validates the inputs, resolves each trainee's next events (scores
//! plus ELCE), then runs the fixed 13-stage allocation order:
//!
//! 1.  Duty supervisor, day window
//! 2.  Duty supervisor, night window (night gate)
//! 3.  Day flight: fixed-time priority events
//! 4.  Day flight: trainee next events
//! 5.  Night flight: fixed-time priority events (night gate)
//! 6.  Night flight: trainee next events (night gate)
//! 7.  FTD: fixed-time priority events
//! 8.  FTD: trainee next events
//! 9.  CPT/ground: fixed-time priority events
//! 10. CPT/ground: trainee next events
//! 11. Day flight: plus-one events
//! 12. FTD: plus-one events
//! 13. CPT/ground: plus-one events
//!
//! Each stage is one bounded pass: every eligible candidate is attempted
//! exactly once against the current line occupancy, and candidates that
//! cannot be placed are dropped into the build report, not retried.
//! Fixed-time commitments go first because they cannot move; the
//! plus-one waves run last so every trainee gets a shot at their primary
//! event across all resource types before opportunistic fill begins.
//!
//! Candidate order inside a stage is a uniformly random permutation
//! drawn from the injected `Rng`; a seeded generator reproduces a build
//! exactly.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::allocator::LineBoard;
use crate::availability::average_availability;
use crate::elce::effective_last_completed;
use crate::models::{
    EventType, FlyingWindow, Instructor, ItemKind, Period, ScheduleEvent, SyllabusItem, Trainee,
    TIME_EPSILON,
};
use crate::planner::{merged_completions, next_events};
use crate::validation::{
    validate_fixed_events, validate_syllabus, validate_timeline, DataIntegrityError,
};

use super::report::{BuildReport, PlacementMiss};
use super::snapshot::{BuildSnapshot, AIRCRAFT_RESOURCE};

/// Line counts, line naming, and search granularity for a build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Aircraft line prefix ("PC-21 1", "PC-21 2", ...).
    pub flight_prefix: String,
    /// FTD line prefix.
    pub ftd_prefix: String,
    /// CPT line prefix.
    pub cpt_prefix: String,
    /// Ground-school line prefix.
    pub ground_prefix: String,
    /// Standby overflow line prefix.
    pub standby_prefix: String,
    /// The dedicated duty supervisor line.
    pub duty_line: String,
    /// Number of FTD lines.
    pub ftd_lines: usize,
    /// Number of CPT lines.
    pub cpt_lines: usize,
    /// Number of ground-school lines.
    pub ground_lines: usize,
    /// Slot search step in hours (0.25 = 15 minutes).
    pub slot_increment: f64,
    /// Minimum gap between a person's consecutive events, covering
    /// briefing and debriefing time.
    pub briefing_gap: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            flight_prefix: "PC-21".into(),
            ftd_prefix: "FTD".into(),
            cpt_prefix: "CPT".into(),
            ground_prefix: "GND".into(),
            standby_prefix: "STBY".into(),
            duty_line: "DUTY SUP".into(),
            ftd_lines: 2,
            cpt_lines: 2,
            ground_lines: 2,
            slot_increment: 0.25,
            briefing_gap: 0.25,
        }
    }
}

impl BuildConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of FTD lines.
    pub fn with_ftd_lines(mut self, count: usize) -> Self {
        self.ftd_lines = count;
        self
    }

    /// Sets the number of CPT lines.
    pub fn with_cpt_lines(mut self, count: usize) -> Self {
        self.cpt_lines = count;
        self
    }

    /// Sets the number of ground-school lines.
    pub fn with_ground_lines(mut self, count: usize) -> Self {
        self.ground_lines = count;
        self
    }

    /// Sets the slot search increment in hours.
    pub fn with_slot_increment(mut self, hours: f64) -> Self {
        self.slot_increment = hours;
        self
    }

    /// Sets the briefing gap in hours.
    pub fn with_briefing_gap(mut self, hours: f64) -> Self {
        self.briefing_gap = hours;
        self
    }
}

/// The produced program plus its report.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The day's events, in placement order.
    pub schedule: Vec<ScheduleEvent>,
    /// Non-fatal findings accumulated during the build.
    pub report: BuildReport,
}

/// One trainee's demand for this build.
#[derive(Debug, Clone)]
struct Demand {
    trainee: Trainee,
    next: Option<SyllabusItem>,
    plus_one: Option<SyllabusItem>,
    completed: HashSet<String>,
}

/// Which candidates a wave draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WaveFilter {
    kind: ItemKind,
    period: Option<Period>,
}

impl WaveFilter {
    fn matches(&self, item: &SyllabusItem) -> bool {
        item.kind == self.kind && self.period.map_or(true, |p| item.period == p)
    }
}

const DAY_FLIGHT: WaveFilter = WaveFilter {
    kind: ItemKind::Flight,
    period: Some(Period::Day),
};
const NIGHT_FLIGHT: WaveFilter = WaveFilter {
    kind: ItemKind::Flight,
    period: Some(Period::Night),
};
const FTD: WaveFilter = WaveFilter {
    kind: ItemKind::Ftd,
    period: None,
};
const CPT: WaveFilter = WaveFilter {
    kind: ItemKind::Cpt,
    period: None,
};
const GROUND: WaveFilter = WaveFilter {
    kind: ItemKind::Ground,
    period: None,
};

/// Builds one day's flying program from a snapshot.
///
/// # Example
/// ```
/// use dfp_build::pipeline::{BuildConfig, DfpBuilder};
/// # use dfp_build::pipeline::BuildSnapshot;
/// # use dfp_build::models::{AvailabilityTimeline, FlyingWindow};
/// # use std::collections::HashMap;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// # let snapshot = BuildSnapshot {
/// #     build_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
/// #     current_time: 6.0,
/// #     day_window: FlyingWindow::new(8.0, 16.0),
/// #     night_window: FlyingWindow::new(18.0, 23.0),
/// #     trainees: vec![],
/// #     instructors: vec![],
/// #     master_syllabus: Default::default(),
/// #     individual_plans: HashMap::new(),
/// #     scores: HashMap::new(),
/// #     prior_day: vec![],
/// #     priority_events: vec![],
/// #     aircraft_timeline: AvailabilityTimeline::new(),
/// # };
/// let builder = DfpBuilder::new();
/// let mut rng = SmallRng::seed_from_u64(7);
/// let outcome = builder.build(&snapshot, &mut rng).unwrap();
/// assert!(outcome.schedule.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DfpBuilder {
    config: BuildConfig,
}

impl DfpBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs one build. The only error path is malformed input; every
    /// expected condition lands in the outcome's report instead.
    pub fn build<R: Rng>(
        &self,
        snapshot: &BuildSnapshot,
        rng: &mut R,
    ) -> Result<BuildOutcome, DataIntegrityError> {
        validate(snapshot)?;

        let mut state = BuildState::new(snapshot, &self.config);
        state.resolve_demands();

        let day = snapshot.day_window;
        let night = snapshot.night_window;

        // Stages 1-2: duty supervision.
        state.place_duty_supervisor(&day, "day window", rng);
        if state.night_gate_open {
            state.place_duty_supervisor(&night, "night window", rng);
        }

        // Stages 3-4: day flight.
        state.place_priority_events(EventType::Flight, false);
        state.place_next_wave(DAY_FLIGHT, &day, rng);

        // Stages 5-6: night flight, gated.
        if state.night_gate_open {
            state.place_priority_events(EventType::Flight, true);
            state.place_next_wave(NIGHT_FLIGHT, &night, rng);
        } else {
            state.report_gate_closed();
        }

        // Stages 7-8: FTD.
        state.place_priority_events(EventType::Ftd, false);
        state.place_next_wave(FTD, &day, rng);

        // Stages 9-10: CPT/ground.
        state.place_priority_events(EventType::Cpt, false);
        state.place_priority_events(EventType::Ground, false);
        state.place_next_wave(CPT, &day, rng);
        state.place_next_wave(GROUND, &day, rng);

        // Stages 11-13: plus-one waves.
        state.place_plus_one_wave(DAY_FLIGHT, &day, rng);
        state.place_plus_one_wave(FTD, &day, rng);
        state.place_plus_one_wave(CPT, &day, rng);
        state.place_plus_one_wave(GROUND, &day, rng);

        Ok(BuildOutcome {
            schedule: state.board.into_events(),
            report: state.report,
        })
    }
}

fn validate(snapshot: &BuildSnapshot) -> Result<(), DataIntegrityError> {
    validate_syllabus(&snapshot.master_syllabus, "master syllabus")?;
    for (trainee, plan) in &snapshot.individual_plans {
        validate_syllabus(plan, &format!("LMP for {trainee}"))?;
    }
    validate_timeline(&snapshot.aircraft_timeline, AIRCRAFT_RESOURCE)?;
    validate_fixed_events(&snapshot.priority_events)?;
    Ok(())
}

struct BuildState<'a> {
    snapshot: &'a BuildSnapshot,
    config: &'a BuildConfig,
    board: LineBoard,
    report: BuildReport,
    demands: Vec<Demand>,
    night_gate_open: bool,
    day_flight_lines: usize,
    night_flight_lines: usize,
    event_seq: usize,
}

impl<'a> BuildState<'a> {
    fn new(snapshot: &'a BuildSnapshot, config: &'a BuildConfig) -> Self {
        let bnf_count = snapshot
            .trainees
            .iter()
            .filter(|t| t.is_active() && t.bnf_qualified)
            .count();
        let night_gate_open = bnf_count >= 2;

        let day_avg = average_availability(&snapshot.day_window, &snapshot.aircraft_timeline);
        let night_avg = average_availability(&snapshot.night_window, &snapshot.aircraft_timeline);

        log::debug!(
            "night gate {} ({bnf_count} BNF trainees); day lines {}, night lines {}",
            if night_gate_open { "open" } else { "closed" },
            day_avg.floor(),
            night_avg.floor()
        );

        Self {
            snapshot,
            config,
            board: LineBoard::new(),
            report: BuildReport::new(),
            demands: Vec::new(),
            night_gate_open,
            day_flight_lines: day_avg.floor() as usize,
            night_flight_lines: night_avg.floor() as usize,
            event_seq: 0,
        }
    }

    fn new_id(&mut self) -> String {
        self.event_seq += 1;
        format!("DFP-{:03}", self.event_seq)
    }

    /// Resolves every active trainee's next events up front (scores
    /// merged with ELCE), so the stages work from one demand list.
    fn resolve_demands(&mut self) {
        for trainee in self.snapshot.trainees.iter().filter(|t| t.is_active()) {
            let plan = self.snapshot.plan_for(&trainee.name);
            if plan.is_empty() {
                self.report.record_empty_plan(&trainee.name);
                continue;
            }

            let scored = self.snapshot.scores_for(&trainee.name);
            let elce = effective_last_completed(
                &trainee.name,
                &self.snapshot.prior_day,
                self.snapshot.build_date,
                self.snapshot.current_time,
            );
            let completed =
                merged_completions(&scored, elce.as_ref().map(|e| e.event_code.as_str()));

            let planned = next_events(plan, &completed);
            self.demands.push(Demand {
                trainee: trainee.clone(),
                next: planned.next.cloned(),
                plus_one: planned.plus_one.cloned(),
                completed,
            });
        }
    }

    /// Stages 1-2: one supervisor holds the duty line for the window.
    fn place_duty_supervisor<R: Rng>(
        &mut self,
        window: &FlyingWindow,
        label: &str,
        rng: &mut R,
    ) {
        let duration = window.duration_hours();
        let chosen = pick_instructor(
            &self.board,
            &self.snapshot.instructors,
            |i| i.flying_supervisor,
            window.start,
            window.end,
            duration,
            rng,
        );

        match chosen {
            Some(name) => {
                let id = self.new_id();
                let event = ScheduleEvent::new(
                    id,
                    self.snapshot.build_date,
                    "DUTY SUP",
                    EventType::Ground,
                    window.start,
                    duration,
                )
                .with_resource(self.config.duty_line.clone())
                .with_instructor(name)
                .time_fixed();
                self.board.place(event);
            }
            None => self
                .report
                .record_miss(PlacementMiss::no_duty_supervisor(label)),
        }
    }

    /// Priority pass: fixed-time events of one type, earliest first.
    /// Events arriving with a line keep it; the rest get first fit on
    /// their family, overflowing to standby packing when full.
    ///
    /// Fixed flights split on the night window alone: the night pass
    /// takes flights starting inside it, the day pass takes every other
    /// fixed flight, so a commitment between the windows is still locked
    /// in at its own time.
    fn place_priority_events(&mut self, event_type: EventType, night: bool) {
        let mut fixed: Vec<ScheduleEvent> = self
            .fixed_events_for(event_type, night)
            .into_iter()
            .cloned()
            .collect();
        fixed.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        for mut event in fixed {
            if event.resource_id.is_empty() {
                let (prefix, count) = self.family_for_kind(kind_for(event.event_type), night);
                let line = self
                    .board
                    .first_free_line(prefix, count, event.start_time, event.duration_hours)
                    .unwrap_or_else(|| {
                        self.board.standby_line(
                            &self.config.standby_prefix,
                            event.start_time,
                            event.duration_hours,
                        )
                    });
                event.resource_id = line;
            }
            self.board.place(event);
        }
    }

    /// Next-event pass: every trainee whose next event belongs to this
    /// wave gets one placement attempt, in random order.
    fn place_next_wave<R: Rng>(&mut self, filter: WaveFilter, window: &FlyingWindow, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.demands.len())
            .filter(|&i| {
                self.demands[i]
                    .next
                    .as_ref()
                    .is_some_and(|item| filter.matches(item))
            })
            .collect();
        order.shuffle(rng);

        for i in order {
            let demand = self.demands[i].clone();
            if let Some(item) = demand.next.as_ref() {
                self.try_place_candidate(&demand.trainee.name, item, window, window.start, rng);
            }
        }
    }

    /// Plus-one pass: strictly a continuation of a realized primary.
    fn place_plus_one_wave<R: Rng>(
        &mut self,
        filter: WaveFilter,
        window: &FlyingWindow,
        rng: &mut R,
    ) {
        let mut order: Vec<usize> = (0..self.demands.len())
            .filter(|&i| {
                self.demands[i]
                    .plus_one
                    .as_ref()
                    .is_some_and(|item| filter.matches(item))
            })
            .collect();
        order.shuffle(rng);

        for i in order {
            let demand = self.demands[i].clone();
            let item = match demand.plus_one.as_ref() {
                Some(item) => item,
                None => continue,
            };
            let primary_code = match demand.next.as_ref() {
                Some(next) => next.code.clone(),
                None => continue,
            };

            let primary_end = match self.board.find_for_trainee(&demand.trainee.name, &primary_code)
            {
                Some(primary) => primary.end_time(),
                None => {
                    self.report.record_miss(PlacementMiss::primary_not_realized(
                        &demand.trainee.name,
                        &item.code,
                    ));
                    continue;
                }
            };

            // Lookahead prerequisites are only now validated, against
            // the completions plus today's realized primary.
            let satisfied = item.prerequisites.iter().all(|p| {
                demand.completed.contains(p) || *p == primary_code
            });
            if !satisfied {
                log::debug!(
                    "plus-one {} for {} still blocked on prerequisites",
                    item.code,
                    demand.trainee.name
                );
                continue;
            }

            let not_before = window.start.max(primary_end);
            self.try_place_candidate(&demand.trainee.name, item, window, not_before, rng);
        }
    }

    /// One bounded placement attempt for a candidate event: walk the
    /// window from `not_before` for a slot where a line, the trainee,
    /// and (when required) an instructor are all free. Personal
    /// availability is checked over the interval widened by the briefing
    /// gap on both sides; line occupancy is not.
    fn try_place_candidate<R: Rng>(
        &mut self,
        trainee: &str,
        item: &SyllabusItem,
        window: &FlyingWindow,
        not_before: f64,
        rng: &mut R,
    ) {
        let night = item.period == Period::Night;
        let (prefix, count) = self.family_for_kind(item.kind, night);
        let prefix = prefix.to_string();
        let duration = item.duration_hours;
        let needs_instructor = item.kind != ItemKind::Ground;

        let mut cursor = not_before;
        let mut saw_free_line = false;

        while let Some((start, line)) = self.board.earliest_slot(
            &prefix,
            count,
            window,
            duration,
            cursor,
            self.config.slot_increment,
        ) {
            saw_free_line = true;
            let end = start + duration;
            let guard_start = start - self.config.briefing_gap;
            let guard_end = end + self.config.briefing_gap;

            if !self.board.person_free(trainee, guard_start, guard_end) {
                cursor = start + self.config.slot_increment;
                continue;
            }

            let instructor = if needs_instructor {
                let eligible: fn(&Instructor) -> bool = if item.kind == ItemKind::Flight {
                    Instructor::may_instruct_flight
                } else {
                    Instructor::may_instruct_synthetic
                };
                match pick_instructor(
                    &self.board,
                    &self.snapshot.instructors,
                    eligible,
                    guard_start,
                    guard_end,
                    duration,
                    rng,
                ) {
                    Some(name) => Some(name),
                    None => {
                        cursor = start + self.config.slot_increment;
                        continue;
                    }
                }
            } else {
                None
            };

            let id = self.new_id();
            let mut event = ScheduleEvent::new(
                id,
                self.snapshot.build_date,
                item.code.clone(),
                event_type_for(item.kind),
                start,
                duration,
            )
            .with_resource(line)
            .with_student(trainee);
            if let Some(name) = instructor {
                event = event.with_instructor(name);
            }
            self.board.place(event);
            return;
        }

        let miss = if saw_free_line {
            PlacementMiss::no_instructor(trainee, &item.code)
        } else {
            PlacementMiss::no_free_line(trainee, &item.code)
        };
        self.report.record_miss(miss);
    }

    /// Fixed-time input events for one pass. Flights split on the night
    /// window; other families are never night-gated.
    fn fixed_events_for(&self, event_type: EventType, night: bool) -> Vec<&ScheduleEvent> {
        let night_window = self.snapshot.night_window;
        self.snapshot
            .priority_events
            .iter()
            .filter(|e| {
                e.is_time_fixed
                    && e.date == self.snapshot.build_date
                    && e.event_type == event_type
                    && (event_type != EventType::Flight
                        || night_window.contains(e.start_time) == night)
            })
            .collect()
    }

    /// Records one gate-closed miss per dropped night candidate, fixed
    /// commitments included, so the report explains the absent night
    /// wave.
    fn report_gate_closed(&mut self) {
        let mut dropped: Vec<(String, String)> = self
            .demands
            .iter()
            .filter_map(|d| {
                d.next
                    .as_ref()
                    .filter(|item| NIGHT_FLIGHT.matches(item))
                    .map(|item| (d.trainee.name.clone(), item.code.clone()))
            })
            .collect();
        dropped.extend(
            self.fixed_events_for(EventType::Flight, true)
                .into_iter()
                .map(|e| {
                    let subject = e.student.clone().unwrap_or_else(|| e.id.clone());
                    (subject, e.event_code.clone())
                }),
        );
        for (subject, code) in dropped {
            self.report
                .record_miss(PlacementMiss::gate_closed(subject, code));
        }
    }

    /// Line family for a syllabus kind. Flight line counts come from the
    /// availability average for the window in play.
    fn family_for_kind(&self, kind: ItemKind, night: bool) -> (&str, usize) {
        let flight_lines = if night {
            self.night_flight_lines
        } else {
            self.day_flight_lines
        };
        match kind {
            ItemKind::Flight => (&self.config.flight_prefix, flight_lines),
            ItemKind::Ftd => (&self.config.ftd_prefix, self.config.ftd_lines),
            ItemKind::Cpt => (&self.config.cpt_prefix, self.config.cpt_lines),
            ItemKind::Ground => (&self.config.ground_prefix, self.config.ground_lines),
        }
    }
}

fn event_type_for(kind: ItemKind) -> EventType {
    match kind {
        ItemKind::Flight => EventType::Flight,
        ItemKind::Ftd => EventType::Ftd,
        ItemKind::Cpt => EventType::Cpt,
        ItemKind::Ground => EventType::Ground,
    }
}

fn kind_for(event_type: EventType) -> ItemKind {
    match event_type {
        EventType::Flight => ItemKind::Flight,
        EventType::Ftd => ItemKind::Ftd,
        EventType::Cpt => ItemKind::Cpt,
        EventType::Ground => ItemKind::Ground,
    }
}

/// Least-loaded eligible instructor free over [start, end), random
/// among equal loads (candidates are shuffled before the minimum is
/// taken, and `min_by` keeps the first of equals).
fn pick_instructor<R: Rng>(
    board: &LineBoard,
    instructors: &[Instructor],
    eligible: impl Fn(&Instructor) -> bool,
    start: f64,
    end: f64,
    duration: f64,
    rng: &mut R,
) -> Option<String> {
    let mut candidates: Vec<&Instructor> = instructors
        .iter()
        .filter(|i| eligible(i))
        .filter(|i| board.person_free(&i.name, start, end))
        .filter(|i| board.committed_hours(&i.name) + duration <= i.max_duty_hours + TIME_EPSILON)
        .collect();
    candidates.shuffle(rng);
    candidates
        .into_iter()
        .min_by(|a, b| {
            board
                .committed_hours(&a.name)
                .total_cmp(&board.committed_hours(&b.name))
        })
        .map(|i| i.name.clone())
}
