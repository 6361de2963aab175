//! Build report.
//!
//! Expected, non-fatal conditions found while building are accumulated
//! here and returned alongside the schedule — never thrown. The
//! surrounding application surfaces the report as a warnings list.

use serde::{Deserialize, Serialize};

/// Why a candidate could not be placed this build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissReason {
    /// No line in the family had a free slot.
    NoFreeLine,
    /// The night-flying gate was closed.
    GateClosed,
    /// Plus-one candidate whose primary event was never placed.
    PrimaryNotRealized,
    /// No eligible instructor could take the event.
    NoInstructor,
    /// No qualified duty supervisor was available for a window.
    NoDutySupervisor,
}

/// A candidate dropped from this build, recorded for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementMiss {
    /// Trainee (or duty window label) the candidate belonged to.
    pub subject: String,
    /// Event code that went unplaced.
    pub event_code: String,
    /// Why placement failed.
    pub reason: MissReason,
}

impl PlacementMiss {
    /// No free slot on any line of the family.
    pub fn no_free_line(subject: impl Into<String>, event_code: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            event_code: event_code.into(),
            reason: MissReason::NoFreeLine,
        }
    }

    /// Night demand dropped because the gate was closed.
    pub fn gate_closed(subject: impl Into<String>, event_code: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            event_code: event_code.into(),
            reason: MissReason::GateClosed,
        }
    }

    /// Plus-one excluded because the primary was never placed.
    pub fn primary_not_realized(
        subject: impl Into<String>,
        event_code: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            event_code: event_code.into(),
            reason: MissReason::PrimaryNotRealized,
        }
    }

    /// No instructor could be matched to the event.
    pub fn no_instructor(subject: impl Into<String>, event_code: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            event_code: event_code.into(),
            reason: MissReason::NoInstructor,
        }
    }

    /// No duty supervisor candidate for a flying window.
    pub fn no_duty_supervisor(window_label: impl Into<String>) -> Self {
        Self {
            subject: window_label.into(),
            event_code: "DUTY SUP".into(),
            reason: MissReason::NoDutySupervisor,
        }
    }
}

/// A trainee with no individual or master plan; they generate no demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyPlanWarning {
    /// The trainee without a plan.
    pub trainee: String,
}

/// Accumulated non-fatal findings for one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    /// Candidates dropped from this build.
    pub misses: Vec<PlacementMiss>,
    /// Trainees with no plan.
    pub warnings: Vec<EmptyPlanWarning>,
}

impl BuildReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a placement miss.
    pub fn record_miss(&mut self, miss: PlacementMiss) {
        log::debug!(
            "placement miss: {} {} ({:?})",
            miss.subject,
            miss.event_code,
            miss.reason
        );
        self.misses.push(miss);
    }

    /// Records an empty-plan warning.
    pub fn record_empty_plan(&mut self, trainee: impl Into<String>) {
        self.warnings.push(EmptyPlanWarning {
            trainee: trainee.into(),
        });
    }

    /// Whether the build completed with nothing to report.
    pub fn is_clean(&self) -> bool {
        self.misses.is_empty() && self.warnings.is_empty()
    }

    /// Misses with a given reason.
    pub fn misses_with<'a>(
        &'a self,
        reason: &'a MissReason,
    ) -> impl Iterator<Item = &'a PlacementMiss> + 'a {
        self.misses.iter().filter(move |m| &m.reason == reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_accumulates() {
        let mut report = BuildReport::new();
        assert!(report.is_clean());

        report.record_miss(PlacementMiss::no_free_line("BLOGGS", "BGF2"));
        report.record_miss(PlacementMiss::gate_closed("CITIZEN", "BNF1"));
        report.record_empty_plan("NGUYEN");

        assert!(!report.is_clean());
        assert_eq!(report.misses.len(), 2);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.misses_with(&MissReason::GateClosed).count(), 1);
    }

    #[test]
    fn test_factories() {
        let m = PlacementMiss::primary_not_realized("BLOGGS", "BGF3");
        assert_eq!(m.reason, MissReason::PrimaryNotRealized);

        let d = PlacementMiss::no_duty_supervisor("night window");
        assert_eq!(d.event_code, "DUTY SUP");
        assert_eq!(d.reason, MissReason::NoDutySupervisor);
    }
}
