//! Parameter decoding and validation
//!
//! Turns the incoming JSON parameter blob into a fully validated
//! [`SimulationConfig`]. Decoding starts from the default colony model and
//! folds the user document over it, so a minimal document only needs
//! `initial` and `steps`. Everything downstream of a successful decode can
//! trust the config: rates are probabilities, every transition references
//! a declared cohort, and initial counts are finite and non-negative.
//!
//! # Default model
//!
//! Cohorts `egg → larva → pupa → worker → forager`, with transitions
//! (rates 0 until configured):
//!
//! | name     | kind      | effect                      |
//! |----------|-----------|-----------------------------|
//! | `death`  | mortality | every cohort                |
//! | `lay`    | birth     | worker count spawns eggs    |
//! | `hatch`  | advance   | egg → larva                 |
//! | `pupate` | advance   | larva → pupa                |
//! | `emerge` | advance   | pupa → worker               |
//! | `forage` | advance   | worker → forager            |
//!
//! A document may replace the model by supplying `cohorts` and
//! `transitions` together.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Cohort names of the default colony model, in life-stage order.
pub const DEFAULT_COHORTS: [&str; 5] = ["egg", "larva", "pupa", "worker", "forager"];

/// Errors produced while decoding or validating a parameter document.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed parameter document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`cohorts` and `transitions` must be supplied together")]
    PartialModel,

    #[error("cohort list is empty")]
    NoCohorts,

    #[error("duplicate cohort `{0}`")]
    DuplicateCohort(String),

    #[error("duplicate transition `{0}`")]
    DuplicateTransition(String),

    #[error("transition `{name}` references unknown cohort `{cohort}`")]
    UnknownCohort { name: String, cohort: String },

    #[error("transition `{0}` is missing a source or target cohort")]
    IncompleteTransition(String),

    #[error("mortality transition `{0}` must not have a target cohort")]
    MortalityWithTarget(String),

    #[error("transition `{0}` advances a cohort into itself")]
    SelfAdvance(String),

    #[error("rate `{0}` does not name a configured transition")]
    UnknownRate(String),

    #[error("rate `{name}` is {value}, outside [0, 1]")]
    RateOutOfRange { name: String, value: f64 },

    #[error("initial count given for unknown cohort `{0}`")]
    UnknownInitialCohort(String),

    #[error("initial count for `{cohort}` is {value}; counts must be finite and non-negative")]
    InvalidCount { cohort: String, value: f64 },

    #[error("stochastic runs need whole initial counts; `{cohort}` is {value}")]
    FractionalCount { cohort: String, value: f64 },
}

/// What a transition does to the cohorts it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Removes individuals from the source cohort (or every cohort if no
    /// source is given)
    Mortality,

    /// Adds individuals to the target cohort in proportion to the source
    /// cohort, leaving the source unchanged
    Birth,

    /// Moves individuals from the source cohort to the target cohort
    Advance,
}

/// A validated demographic rule.
///
/// `source`/`target` are indices into the config's cohort list, resolved
/// during decoding so the engine never does name lookups per step.
#[derive(Debug, Clone)]
pub struct Transition {
    /// Unique rule name; the `rates` map keys against it
    pub name: String,

    /// What the rule does
    pub kind: TransitionKind,

    /// Source cohort index (`None` only for mortality applying to all)
    pub source: Option<usize>,

    /// Target cohort index (`None` for mortality)
    pub target: Option<usize>,

    /// Per-step per-individual probability in [0, 1]
    pub rate: f64,
}

/// Immutable, fully validated simulation configuration.
///
/// Produced once per call by [`decode`]; the engine performs no further
/// input validation.
///
/// # Example
/// ```
/// use beecs_core_rs::config;
///
/// let cfg = config::decode(r#"{"initial":{"egg":100},"steps":3}"#).unwrap();
/// assert_eq!(cfg.steps, 3);
/// assert_eq!(cfg.cohorts.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Cohort category names, in fixed order
    pub cohorts: Vec<String>,

    /// Demographic rule table; application order is documented in the
    /// engine module
    pub transitions: Vec<Transition>,

    /// Initial count per cohort, in cohort order
    pub initial: Vec<f64>,

    /// Number of simulated steps
    pub steps: u32,

    /// RNG seed for stochastic runs
    pub seed: u64,

    /// Discrete sampled dynamics instead of expected-value dynamics
    pub stochastic: bool,

    /// Record a per-step snapshot sequence in the result
    pub trajectory: bool,
}

impl Default for SimulationConfig {
    /// The default colony model with zero rates, zero counts and zero
    /// steps. Decoding folds the user document over this.
    fn default() -> Self {
        let cohorts: Vec<String> = DEFAULT_COHORTS.iter().map(|s| s.to_string()).collect();
        let t = |name: &str, kind: TransitionKind, source: Option<usize>, target: Option<usize>| {
            Transition {
                name: name.to_string(),
                kind,
                source,
                target,
                rate: 0.0,
            }
        };
        // egg=0, larva=1, pupa=2, worker=3, forager=4
        let transitions = vec![
            t("death", TransitionKind::Mortality, None, None),
            t("lay", TransitionKind::Birth, Some(3), Some(0)),
            t("hatch", TransitionKind::Advance, Some(0), Some(1)),
            t("pupate", TransitionKind::Advance, Some(1), Some(2)),
            t("emerge", TransitionKind::Advance, Some(2), Some(3)),
            t("forage", TransitionKind::Advance, Some(3), Some(4)),
        ];
        Self {
            initial: vec![0.0; cohorts.len()],
            cohorts,
            transitions,
            steps: 0,
            seed: 0,
            stochastic: false,
            trajectory: true,
        }
    }
}

impl SimulationConfig {
    /// Number of cohort categories.
    pub fn num_cohorts(&self) -> usize {
        self.cohorts.len()
    }

    /// Resolve a cohort name to its index.
    pub fn cohort_index(&self, name: &str) -> Option<usize> {
        self.cohorts.iter().position(|c| c == name)
    }

    /// Build a config from a user-supplied model, validating structure.
    fn from_model(
        cohorts: Vec<String>,
        transitions: Vec<RawTransition>,
    ) -> Result<Self, DecodeError> {
        if cohorts.is_empty() {
            return Err(DecodeError::NoCohorts);
        }

        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, name) in cohorts.iter().enumerate() {
            if index.insert(name.as_str(), i).is_some() {
                return Err(DecodeError::DuplicateCohort(name.clone()));
            }
        }

        let mut seen_names = std::collections::HashSet::new();
        let mut validated = Vec::with_capacity(transitions.len());
        for raw in &transitions {
            if !seen_names.insert(raw.name.as_str()) {
                return Err(DecodeError::DuplicateTransition(raw.name.clone()));
            }

            let resolve = |cohort: &Option<String>| -> Result<Option<usize>, DecodeError> {
                match cohort {
                    None => Ok(None),
                    Some(c) => index.get(c.as_str()).copied().map(Some).ok_or_else(|| {
                        DecodeError::UnknownCohort {
                            name: raw.name.clone(),
                            cohort: c.clone(),
                        }
                    }),
                }
            };
            let source = resolve(&raw.source)?;
            let target = resolve(&raw.target)?;

            match raw.kind {
                TransitionKind::Mortality => {
                    if target.is_some() {
                        return Err(DecodeError::MortalityWithTarget(raw.name.clone()));
                    }
                }
                TransitionKind::Birth => {
                    if source.is_none() || target.is_none() {
                        return Err(DecodeError::IncompleteTransition(raw.name.clone()));
                    }
                }
                TransitionKind::Advance => {
                    if source.is_none() || target.is_none() {
                        return Err(DecodeError::IncompleteTransition(raw.name.clone()));
                    }
                    if source == target {
                        return Err(DecodeError::SelfAdvance(raw.name.clone()));
                    }
                }
            }

            validated.push(Transition {
                name: raw.name.clone(),
                kind: raw.kind,
                source,
                target,
                rate: 0.0,
            });
        }

        Ok(Self {
            initial: vec![0.0; cohorts.len()],
            cohorts,
            transitions: validated,
            steps: 0,
            seed: 0,
            stochastic: false,
            trajectory: true,
        })
    }

    /// Apply the `rates` map onto the transition table.
    fn apply_rates(&mut self, rates: &BTreeMap<String, f64>) -> Result<(), DecodeError> {
        for (name, &value) in rates {
            let transition = self
                .transitions
                .iter_mut()
                .find(|t| t.name == *name)
                .ok_or_else(|| DecodeError::UnknownRate(name.clone()))?;
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DecodeError::RateOutOfRange {
                    name: name.clone(),
                    value,
                });
            }
            transition.rate = value;
        }
        Ok(())
    }

    /// Apply the `initial` map onto the count vector.
    fn apply_initial(&mut self, initial: &BTreeMap<String, f64>) -> Result<(), DecodeError> {
        for (name, &value) in initial {
            let idx = self
                .cohort_index(name)
                .ok_or_else(|| DecodeError::UnknownInitialCohort(name.clone()))?;
            if !value.is_finite() || value < 0.0 {
                return Err(DecodeError::InvalidCount {
                    cohort: name.clone(),
                    value,
                });
            }
            if self.stochastic && value.fract() != 0.0 {
                return Err(DecodeError::FractionalCount {
                    cohort: name.clone(),
                    value,
                });
            }
            self.initial[idx] = value;
        }
        Ok(())
    }
}

/// Wire form of a transition, before cohort names are resolved.
#[derive(Debug, Clone, Deserialize)]
struct RawTransition {
    name: String,
    kind: TransitionKind,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

/// Wire form of the parameter document. Unknown top-level fields are
/// ignored, matching the tolerant unmarshalling of the reference hosts.
#[derive(Debug, Deserialize)]
struct RawParams {
    #[serde(default)]
    cohorts: Option<Vec<String>>,
    #[serde(default)]
    transitions: Option<Vec<RawTransition>>,
    initial: BTreeMap<String, f64>,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
    steps: u32,
    #[serde(default)]
    seed: u64,
    #[serde(default)]
    stochastic: bool,
    #[serde(default = "default_trajectory")]
    trajectory: bool,
}

fn default_trajectory() -> bool {
    true
}

/// Decode and validate a parameter document.
///
/// Pure parse + validate: no side effects, and a successful decode means
/// no further validation is needed downstream.
///
/// # Errors
///
/// [`DecodeError`] when the blob is not well-formed JSON, required fields
/// (`initial`, `steps`) are absent or mistyped, a rate lies outside
/// [0, 1], counts are negative, or the custom model is inconsistent.
pub fn decode(params_json: &str) -> Result<SimulationConfig, DecodeError> {
    let raw: RawParams = serde_json::from_str(params_json)?;

    let mut config = match (raw.cohorts, raw.transitions) {
        (None, None) => SimulationConfig::default(),
        (Some(cohorts), Some(transitions)) => SimulationConfig::from_model(cohorts, transitions)?,
        _ => return Err(DecodeError::PartialModel),
    };

    config.steps = raw.steps;
    config.seed = raw.seed;
    config.stochastic = raw.stochastic;
    config.trajectory = raw.trajectory;

    config.apply_rates(&raw.rates)?;
    config.apply_initial(&raw.initial)?;

    Ok(config)
}
