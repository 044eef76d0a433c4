//! Domain types: cohort state and trajectory recording.

pub mod cohort;
pub mod trajectory;

pub use cohort::CohortState;
pub use trajectory::{Snapshot, Trajectory};
