//! The build pipeline.
//!
//! - **`snapshot`**: Input assembly — the provider traits and the
//!   immutable `BuildSnapshot` a build runs against
//! - **`build`**: The 13-stage allocation itself (`DfpBuilder`)
//! - **`report`**: Placement misses and warnings accumulated per build

pub mod build;
pub mod report;
pub mod snapshot;

pub use build::{BuildConfig, BuildOutcome, DfpBuilder};
pub use report::{BuildReport, EmptyPlanWarning, MissReason, PlacementMiss};
pub use snapshot::{
    AvailabilityProvider, BuildSnapshot, PersonnelProvider, ScheduleProvider, ScoreProvider,
    SyllabusProvider, AIRCRAFT_RESOURCE,
};
