//! Tests for parameter decoding and validation
//!
//! The decoder is the only validation layer: everything downstream trusts
//! a successfully decoded config, so rejection has to happen here.

use beecs_core_rs::config::{decode, DecodeError, TransitionKind, DEFAULT_COHORTS};

fn rate_of(cfg: &beecs_core_rs::SimulationConfig, name: &str) -> f64 {
    cfg.transitions
        .iter()
        .find(|t| t.name == name)
        .map(|t| t.rate)
        .unwrap()
}

#[test]
fn test_minimal_document_decodes_with_defaults() {
    let cfg = decode(r#"{"initial":{"egg":100,"worker":50},"steps":7}"#).unwrap();

    assert_eq!(cfg.cohorts, DEFAULT_COHORTS);
    assert_eq!(cfg.steps, 7);
    assert_eq!(cfg.seed, 0);
    assert!(!cfg.stochastic);
    assert!(cfg.trajectory);
    assert_eq!(cfg.initial, vec![100.0, 0.0, 0.0, 50.0, 0.0]);
}

#[test]
fn test_all_fields_decode() {
    let cfg = decode(
        r#"{
            "initial": {"egg": 100},
            "rates": {"hatch": 0.3, "death": 0.05, "lay": 0.2},
            "steps": 30,
            "seed": 42,
            "stochastic": true,
            "trajectory": false
        }"#,
    )
    .unwrap();

    assert_eq!(cfg.steps, 30);
    assert_eq!(cfg.seed, 42);
    assert!(cfg.stochastic);
    assert!(!cfg.trajectory);
    assert_eq!(rate_of(&cfg, "hatch"), 0.3);
    assert_eq!(rate_of(&cfg, "death"), 0.05);
    assert_eq!(rate_of(&cfg, "lay"), 0.2);
}

#[test]
fn test_unknown_top_level_fields_are_ignored() {
    // Tolerant unmarshalling: hosts may pass extra keys
    let cfg = decode(r#"{"initial":{"egg":1},"steps":1,"reporters":["worker_cohorts"]}"#).unwrap();
    assert_eq!(cfg.steps, 1);
}

#[test]
fn test_not_json_rejected() {
    let err = decode("definitely not json").unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_missing_initial_rejected() {
    let err = decode(r#"{"steps":1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_missing_steps_rejected() {
    let err = decode(r#"{"initial":{"egg":1}}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_negative_steps_rejected() {
    let err = decode(r#"{"initial":{"egg":1},"steps":-1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_wrong_type_rejected() {
    let err = decode(r#"{"initial":{"egg":"many"},"steps":1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_rate_above_one_rejected() {
    let err = decode(r#"{"initial":{"egg":1},"rates":{"hatch":1.5},"steps":1}"#).unwrap_err();
    assert!(
        matches!(err, DecodeError::RateOutOfRange { ref name, value } if name == "hatch" && value == 1.5)
    );
}

#[test]
fn test_negative_rate_rejected() {
    let err = decode(r#"{"initial":{"egg":1},"rates":{"death":-0.1},"steps":1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::RateOutOfRange { .. }));
}

#[test]
fn test_boundary_rates_accepted() {
    let cfg = decode(r#"{"initial":{"egg":1},"rates":{"hatch":0.0,"death":1.0},"steps":1}"#).unwrap();
    assert_eq!(rate_of(&cfg, "hatch"), 0.0);
    assert_eq!(rate_of(&cfg, "death"), 1.0);
}

#[test]
fn test_unknown_rate_name_rejected() {
    let err = decode(r#"{"initial":{"egg":1},"rates":{"swarm":0.5},"steps":1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownRate(name) if name == "swarm"));
}

#[test]
fn test_unknown_initial_cohort_rejected() {
    let err = decode(r#"{"initial":{"drone":10},"steps":1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownInitialCohort(name) if name == "drone"));
}

#[test]
fn test_negative_initial_count_rejected() {
    let err = decode(r#"{"initial":{"egg":-5},"steps":1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidCount { ref cohort, value } if cohort == "egg" && value == -5.0));
}

#[test]
fn test_fractional_initial_count_rejected_when_stochastic() {
    let err =
        decode(r#"{"initial":{"egg":10.5},"steps":1,"stochastic":true}"#).unwrap_err();
    assert!(matches!(err, DecodeError::FractionalCount { ref cohort, .. } if cohort == "egg"));
}

#[test]
fn test_fractional_initial_count_allowed_when_deterministic() {
    let cfg = decode(r#"{"initial":{"egg":10.5},"steps":1}"#).unwrap();
    assert_eq!(cfg.initial[0], 10.5);
}

#[test]
fn test_custom_model_decodes() {
    let cfg = decode(
        r#"{
            "cohorts": ["seed", "sprout", "plant"],
            "transitions": [
                {"name": "wither", "kind": "mortality", "source": "sprout"},
                {"name": "germinate", "kind": "advance", "source": "seed", "target": "sprout"},
                {"name": "grow", "kind": "advance", "source": "sprout", "target": "plant"},
                {"name": "reseed", "kind": "birth", "source": "plant", "target": "seed"}
            ],
            "initial": {"seed": 1000},
            "rates": {"germinate": 0.25, "reseed": 0.1},
            "steps": 4
        }"#,
    )
    .unwrap();

    assert_eq!(cfg.cohorts, vec!["seed", "sprout", "plant"]);
    assert_eq!(cfg.transitions.len(), 4);
    assert_eq!(cfg.transitions[0].kind, TransitionKind::Mortality);
    assert_eq!(cfg.transitions[0].source, Some(1));
    assert_eq!(cfg.transitions[3].kind, TransitionKind::Birth);
    assert_eq!(rate_of(&cfg, "germinate"), 0.25);
}

#[test]
fn test_transitions_without_cohorts_rejected() {
    let err = decode(
        r#"{
            "transitions": [{"name": "x", "kind": "mortality"}],
            "initial": {},
            "steps": 1
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::PartialModel));
}

#[test]
fn test_empty_cohort_list_rejected() {
    let err = decode(r#"{"cohorts":[],"transitions":[],"initial":{},"steps":1}"#).unwrap_err();
    assert!(matches!(err, DecodeError::NoCohorts));
}

#[test]
fn test_duplicate_cohort_rejected() {
    let err = decode(
        r#"{"cohorts":["a","a"],"transitions":[],"initial":{},"steps":1}"#,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::DuplicateCohort(name) if name == "a"));
}

#[test]
fn test_duplicate_transition_rejected() {
    let err = decode(
        r#"{
            "cohorts": ["a", "b"],
            "transitions": [
                {"name": "go", "kind": "advance", "source": "a", "target": "b"},
                {"name": "go", "kind": "mortality"}
            ],
            "initial": {},
            "steps": 1
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::DuplicateTransition(name) if name == "go"));
}

#[test]
fn test_transition_with_unknown_cohort_rejected() {
    let err = decode(
        r#"{
            "cohorts": ["a"],
            "transitions": [{"name": "go", "kind": "advance", "source": "a", "target": "b"}],
            "initial": {},
            "steps": 1
        }"#,
    )
    .unwrap_err();
    assert!(
        matches!(err, DecodeError::UnknownCohort { ref name, ref cohort } if name == "go" && cohort == "b")
    );
}

#[test]
fn test_advance_without_target_rejected() {
    let err = decode(
        r#"{
            "cohorts": ["a", "b"],
            "transitions": [{"name": "go", "kind": "advance", "source": "a"}],
            "initial": {},
            "steps": 1
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::IncompleteTransition(name) if name == "go"));
}

#[test]
fn test_birth_without_source_rejected() {
    let err = decode(
        r#"{
            "cohorts": ["a"],
            "transitions": [{"name": "spawn", "kind": "birth", "target": "a"}],
            "initial": {},
            "steps": 1
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::IncompleteTransition(name) if name == "spawn"));
}

#[test]
fn test_mortality_with_target_rejected() {
    let err = decode(
        r#"{
            "cohorts": ["a", "b"],
            "transitions": [{"name": "die", "kind": "mortality", "source": "a", "target": "b"}],
            "initial": {},
            "steps": 1
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::MortalityWithTarget(name) if name == "die"));
}
