//! Cohort simulation engine
//!
//! Advances a population of cohorts through discrete time steps according
//! to the configured demographic rules.
//!
//! # Step order
//!
//! Each step applies the transition table in a fixed, documented order so
//! that results are reproducible:
//!
//! ```text
//! For each step:
//! 1. Mortality    - every mortality transition removes individuals
//! 2. Recruitment  - every birth transition adds individuals, table order
//! 3. Advancement  - advance transitions move individuals, REVERSE table
//!                   order, so an individual advances at most one life
//!                   stage per step
//! 4. Invariant check + snapshot
//! ```
//!
//! # Numeric semantics
//!
//! Counts are `f64`. Deterministic runs use fractional expected-value
//! dynamics (`count × rate`). Stochastic runs draw whole counts from a
//! seeded, instance-local xorshift64* generator (`Binomial(count, rate)`),
//! so counts stay integers and a seed fully reproduces a run. The two
//! modes are never mixed within a run.
//!
//! # Example
//!
//! ```
//! use beecs_core_rs::{config, Engine};
//!
//! let cfg = config::decode(
//!     r#"{"initial":{"egg":100,"worker":50},
//!         "rates":{"hatch":0.3,"death":0.05},
//!         "steps":1,"seed":42}"#,
//! ).unwrap();
//!
//! let mut engine = Engine::new(cfg);
//! engine.run().unwrap();
//! assert_eq!(engine.state().count(0), 66.5); // egg, after mortality then hatch
//! ```

use crate::config::{SimulationConfig, TransitionKind};
use crate::models::{CohortState, Trajectory};
use crate::rng::RngManager;
use thiserror::Error;

/// Counts this close below zero are treated as rounding dust and clamped.
const COUNT_TOLERANCE: f64 = 1e-9;

/// Internal invariant violations.
///
/// Unreachable on input that passed the decoder; hitting one of these is
/// a defect in the engine, not a user-facing condition.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("cohort `{cohort}` reached invalid count {count} at step {step}")]
    InvalidCount {
        cohort: String,
        count: f64,
        step: u32,
    },
}

/// Per-step totals, useful for conservation checks and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Step number just executed (0-indexed)
    pub step: u32,

    /// Individuals removed by mortality this step
    pub deaths: f64,

    /// Individuals added by recruitment this step
    pub births: f64,

    /// Individuals moved between cohorts this step
    pub advanced: f64,
}

/// The simulation engine: owns the config, state, RNG and trajectory.
///
/// Stateless across calls at the library boundary: each invocation builds
/// its own engine, so concurrent simulations never share mutable state.
pub struct Engine {
    config: SimulationConfig,
    state: CohortState,
    rng: RngManager,
    trajectory: Option<Trajectory>,
    current_step: u32,
}

impl Engine {
    /// Build an engine from a validated config.
    ///
    /// Infallible: the decoder guarantees every invariant the engine
    /// relies on, so there is nothing left to reject here.
    pub fn new(config: SimulationConfig) -> Self {
        let state = CohortState::new(config.initial.clone());
        let rng = RngManager::new(config.seed);

        let trajectory = if config.trajectory {
            let mut t = Trajectory::new();
            t.record(&state, &config.cohorts);
            Some(t)
        } else {
            None
        };

        Self {
            config,
            state,
            rng,
            trajectory,
            current_step: 0,
        }
    }

    /// The config this engine runs under.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current cohort state.
    pub fn state(&self) -> &CohortState {
        &self.state
    }

    /// Recorded trajectory, if the config asked for one.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Steps executed so far.
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    /// How many individuals out of `count` undergo a transition with the
    /// given per-individual probability.
    fn draw(&mut self, count: f64, rate: f64) -> f64 {
        if self.config.stochastic {
            self.rng.binomial(count as u64, rate) as f64
        } else {
            count * rate
        }
    }

    /// Execute one simulation step.
    pub fn step(&mut self) -> Result<StepResult, SimulationError> {
        let step = self.current_step;
        let mut deaths = 0.0;
        let mut births = 0.0;
        let mut advanced = 0.0;

        // Phase 1: mortality
        for i in 0..self.config.transitions.len() {
            let t = &self.config.transitions[i];
            if t.kind != TransitionKind::Mortality || t.rate == 0.0 {
                continue;
            }
            let (source, rate) = (t.source, t.rate);
            match source {
                Some(idx) => {
                    let count = self.state.count(idx);
                    let removed = self.draw(count, rate);
                    self.state.counts_mut()[idx] = count - removed;
                    deaths += removed;
                }
                None => {
                    for idx in 0..self.state.num_cohorts() {
                        let count = self.state.count(idx);
                        let removed = self.draw(count, rate);
                        self.state.counts_mut()[idx] = count - removed;
                        deaths += removed;
                    }
                }
            }
        }

        // Phase 2: recruitment, in table order
        for i in 0..self.config.transitions.len() {
            let t = &self.config.transitions[i];
            if t.kind != TransitionKind::Birth || t.rate == 0.0 {
                continue;
            }
            let (source, target, rate) = (t.source, t.target, t.rate);
            if let (Some(src), Some(tgt)) = (source, target) {
                let count = self.state.count(src);
                let born = self.draw(count, rate);
                self.state.counts_mut()[tgt] += born;
                births += born;
            }
        }

        // Phase 3: advancement, in REVERSE table order so individuals
        // move at most one stage per step
        for i in (0..self.config.transitions.len()).rev() {
            let t = &self.config.transitions[i];
            if t.kind != TransitionKind::Advance || t.rate == 0.0 {
                continue;
            }
            let (source, target, rate) = (t.source, t.target, t.rate);
            if let (Some(src), Some(tgt)) = (source, target) {
                let count = self.state.count(src);
                let moved = self.draw(count, rate);
                self.state.counts_mut()[src] = count - moved;
                self.state.counts_mut()[tgt] += moved;
                advanced += moved;
            }
        }

        // Phase 4: invariant check; clamp rounding dust, reject defects
        for idx in 0..self.state.num_cohorts() {
            let count = self.state.count(idx);
            if !count.is_finite() || count < -COUNT_TOLERANCE {
                return Err(SimulationError::InvalidCount {
                    cohort: self.config.cohorts[idx].clone(),
                    count,
                    step,
                });
            }
            if count < 0.0 {
                self.state.counts_mut()[idx] = 0.0;
            }
        }

        self.current_step += 1;

        if let Some(trajectory) = &mut self.trajectory {
            trajectory.record(&self.state, &self.config.cohorts);
        }

        Ok(StepResult {
            step,
            deaths,
            births,
            advanced,
        })
    }

    /// Run the configured number of steps to completion.
    ///
    /// With `steps = 0` this is a no-op and the state stays exactly the
    /// initial state.
    pub fn run(&mut self) -> Result<(), SimulationError> {
        for _ in 0..self.config.steps {
            self.step()?;
        }
        Ok(())
    }
}
