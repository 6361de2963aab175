//! Daily Flying Program build core for a PC-21 flight training school.
//!
//! Builds one day's flying program from a snapshot of trainee plans,
//! completion scores, staff, and aircraft availability: a priority-ordered
//! greedy allocation over resource lines, with next-event inference from
//! yesterday's unscored flying (ELCE) and an opportunistic second-event
//! wave per trainee.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `SyllabusItem`, `ScheduleEvent`,
//!   `Trainee`, `Instructor`, `FlyingWindow`, `AvailabilityTimeline`
//! - **`availability`**: Time-weighted aircraft availability averaging
//! - **`elce`**: Effective Last Completed Event inference
//! - **`planner`**: Next / next-plus-one event resolution per trainee
//! - **`allocator`**: First-fit line allocation and standby packing
//! - **`validation`**: Input integrity checks (prerequisite cycles,
//!   timeline ordering, fixed-event collisions)
//! - **`pipeline`**: Snapshot assembly and the 13-stage build
//!
//! # Determinism
//!
//! Every random choice flows through one injected `rand::Rng`; a build is
//! a pure function of (snapshot, config, seed). Tie-breaks between
//! equally eligible candidates are uniform, so repeated builds with fresh
//! seeds spread opportunity across trainees and instructors rather than
//! favouring list order.

pub mod allocator;
pub mod availability;
pub mod elce;
pub mod models;
pub mod pipeline;
pub mod planner;
pub mod validation;

pub use pipeline::{BuildConfig, BuildOutcome, BuildSnapshot, DfpBuilder};
pub use validation::DataIntegrityError;
