//! Personnel models.
//!
//! Trainees and instructors as the build pipeline sees them: names,
//! qualification flags, and pause state. Duty-hour totals accumulated
//! during a build are tracked by the pipeline itself, not on these types.

use serde::{Deserialize, Serialize};

/// A trainee on a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trainee {
    /// Full name, unique across the unit.
    pub name: String,
    /// Course identifier.
    pub course: String,
    /// Holds the Basic Night Flying category (eligible for night lines).
    pub bnf_qualified: bool,
    /// Paused trainees generate no program demand.
    pub paused: bool,
}

impl Trainee {
    /// Creates an active day-only trainee.
    pub fn new(name: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            course: course.into(),
            bnf_qualified: false,
            paused: false,
        }
    }

    /// Marks the trainee BNF-qualified.
    pub fn bnf_qualified(mut self) -> Self {
        self.bnf_qualified = true;
        self
    }

    /// Pauses the trainee.
    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    /// Whether the trainee generates demand this build.
    pub fn is_active(&self) -> bool {
        !self.paused
    }
}

/// An instructor on staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    /// Full name, unique across the unit.
    pub name: String,
    /// Qualified Flying Instructor (may instruct live flying).
    pub qfi: bool,
    /// Other Flying Instructor (simulator and ground instruction).
    pub ofi: bool,
    /// Chief Flying Instructor.
    pub cfi: bool,
    /// May hold the duty supervisor line.
    pub flying_supervisor: bool,
    /// Daily duty-period cap in hours.
    pub max_duty_hours: f64,
}

impl Instructor {
    /// Creates an instructor with no qualifications and the default
    /// eight-hour duty period.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qfi: false,
            ofi: false,
            cfi: false,
            flying_supervisor: false,
            max_duty_hours: 8.0,
        }
    }

    /// Grants the QFI qualification.
    pub fn qfi(mut self) -> Self {
        self.qfi = true;
        self
    }

    /// Grants the OFI qualification.
    pub fn ofi(mut self) -> Self {
        self.ofi = true;
        self
    }

    /// Grants the CFI appointment (implies QFI).
    pub fn cfi(mut self) -> Self {
        self.cfi = true;
        self.qfi = true;
        self
    }

    /// Grants the flying supervisor qualification.
    pub fn flying_supervisor(mut self) -> Self {
        self.flying_supervisor = true;
        self
    }

    /// Sets the daily duty-period cap.
    pub fn with_max_duty_hours(mut self, hours: f64) -> Self {
        self.max_duty_hours = hours;
        self
    }

    /// Whether the instructor may instruct in a given seat.
    ///
    /// Live flying requires QFI; simulator and ground instruction accept
    /// QFI or OFI.
    pub fn may_instruct_flight(&self) -> bool {
        self.qfi
    }

    /// Whether the instructor may instruct simulator or ground events.
    pub fn may_instruct_synthetic(&self) -> bool {
        self.qfi || self.ofi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainee_builder() {
        let t = Trainee::new("BLOGGS", "ADF240").bnf_qualified();
        assert!(t.bnf_qualified);
        assert!(t.is_active());

        let p = Trainee::new("CITIZEN", "ADF240").paused();
        assert!(!p.is_active());
    }

    #[test]
    fn test_instructor_qualifications() {
        let qfi = Instructor::new("SMITH").qfi().flying_supervisor();
        assert!(qfi.may_instruct_flight());
        assert!(qfi.may_instruct_synthetic());
        assert!(qfi.flying_supervisor);

        let ofi = Instructor::new("JONES").ofi();
        assert!(!ofi.may_instruct_flight());
        assert!(ofi.may_instruct_synthetic());

        let cfi = Instructor::new("BROWN").cfi();
        assert!(cfi.qfi); // CFI implies QFI
    }

    #[test]
    fn test_duty_hours_default() {
        let i = Instructor::new("SMITH");
        assert!((i.max_duty_hours - 8.0).abs() < 1e-10);

        let short = Instructor::new("LEE").with_max_duty_hours(6.0);
        assert!((short.max_duty_hours - 6.0).abs() < 1e-10);
    }
}
