//! beecs core - bee colony cohort simulation engine
//!
//! Discrete-time population-dynamics simulator behind the `beecs_run`
//! foreign entry point: one JSON parameter document in, one JSON result
//! document out.
//!
//! # Architecture
//!
//! - **config**: parameter decoding and validation (ParameterDecoder)
//! - **models**: domain types (CohortState, Trajectory)
//! - **engine**: the step loop applying demographic rules in fixed order
//! - **output**: versioned result document encoding (ResultEncoder)
//! - **run**: the decode → simulate → encode pipeline
//! - **rng**: deterministic random number generation
//! - **ffi**: C-ABI boundary adapter with explicit buffer ownership
//!
//! # Critical Invariants
//!
//! 1. Cohort counts are f64, finite and non-negative at every observable
//!    point
//! 2. All randomness is deterministic (seeded, instance-local RNG); a
//!    fixed seed and config reproduce a run byte for byte
//! 3. The FFI boundary is all-or-nothing: a complete document or nothing

// Module declarations
pub mod config;
pub mod engine;
pub mod ffi;
pub mod models;
pub mod output;
pub mod rng;
pub mod run;

// Re-exports for convenience
pub use config::{decode, DecodeError, SimulationConfig, Transition, TransitionKind};
pub use engine::{Engine, SimulationError, StepResult};
pub use models::{CohortState, Snapshot, Trajectory};
pub use output::{EncodeError, ErrorInfo, ResultDocument};
pub use rng::RngManager;
pub use run::{run, run_to_json, RunError};
