//! Result encoding
//!
//! Serializes the final cohort state (and optional trajectory) into the
//! versioned result document handed back across the boundary.
//!
//! # Schema stability
//!
//! `schema_version` is bumped on any field rename or reshape. The field
//! set is fixed: on failure the payload fields are all `null` and `error`
//! carries the class and message; on success `error` is `null`. Cohort
//! maps are `BTreeMap`s, so keys serialize in sorted order and a fixed
//! seed + config yields byte-identical JSON.

use crate::config::SimulationConfig;
use crate::models::{CohortState, Snapshot, Trajectory};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Current result document schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors produced while encoding the result document.
///
/// Defensive: unreachable given a correct engine.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("final state violates cohort invariants: `{cohort}` is {count}")]
    InvalidState { cohort: String, count: f64 },

    #[error("result serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structured failure report carried inside the result document.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Error class: `decode`, `simulation` or `encode`
    pub kind: String,

    /// Human-readable detail
    pub message: String,
}

/// The output JSON document.
///
/// Field order is declaration order and is part of the schema.
#[derive(Debug, Clone, Serialize)]
pub struct ResultDocument {
    /// Schema revision of this document
    pub schema_version: u32,

    /// Populated on failure; `null` on success
    pub error: Option<ErrorInfo>,

    /// Steps the run was configured for
    pub steps: Option<u32>,

    /// Whether the run used sampled dynamics
    pub stochastic: Option<bool>,

    /// Cohort category names, in model order
    pub cohorts: Option<Vec<String>>,

    /// SHA-256 hex digest of the exact parameter document received
    pub params_digest: Option<String>,

    /// Final cohort counts
    #[serde(rename = "final")]
    pub final_counts: Option<Snapshot>,

    /// Per-step snapshots (index 0 = initial state), when requested
    pub trajectory: Option<Vec<Snapshot>>,
}

impl ResultDocument {
    /// Build a success document from a finished engine run.
    ///
    /// Checks the CohortState invariants one last time before anything
    /// crosses the boundary; a violation here means the engine has a
    /// defect and the run reports failure instead of shipping a corrupt
    /// document.
    pub fn success(
        config: &SimulationConfig,
        state: &CohortState,
        trajectory: Option<&Trajectory>,
        params_digest: String,
    ) -> Result<Self, EncodeError> {
        for (idx, &count) in state.counts().iter().enumerate() {
            if !count.is_finite() || count < 0.0 {
                return Err(EncodeError::InvalidState {
                    cohort: config.cohorts[idx].clone(),
                    count,
                });
            }
        }

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            error: None,
            steps: Some(config.steps),
            stochastic: Some(config.stochastic),
            cohorts: Some(config.cohorts.clone()),
            params_digest: Some(params_digest),
            final_counts: Some(state.snapshot(&config.cohorts)),
            trajectory: trajectory.map(|t| t.snapshots().to_vec()),
        })
    }

    /// Build a failure document: every payload field `null`, `error` set.
    pub fn failure(kind: &str, message: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            error: Some(ErrorInfo {
                kind: kind.to_string(),
                message: message.to_string(),
            }),
            steps: None,
            stochastic: None,
            cohorts: None,
            params_digest: None,
            final_counts: None,
            trajectory: None,
        }
    }

    /// Serialize to the wire form.
    pub fn to_json(&self) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// SHA-256 hex digest of the exact parameter document as received.
///
/// Ties a result to the input that produced it, for replay matching.
pub fn params_digest(params_json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(params_json.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::models::CohortState;

    #[test]
    fn test_digest_is_stable_hex() {
        let a = params_digest("{}");
        let b = params_digest("{}");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_failure_document_shape() {
        let doc = ResultDocument::failure("decode", "boom");
        let json = doc.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["error"]["kind"], "decode");
        assert_eq!(value["error"]["message"], "boom");
        assert!(value["final"].is_null());
        assert!(value["trajectory"].is_null());
        assert!(value["cohorts"].is_null());
    }

    #[test]
    fn test_success_rejects_negative_state() {
        let cfg = config::decode(r#"{"initial":{},"steps":0}"#).unwrap();
        let state = CohortState::new(vec![1.0, -2.0, 0.0, 0.0, 0.0]);

        let err = ResultDocument::success(&cfg, &state, None, String::new()).unwrap_err();
        assert!(matches!(err, EncodeError::InvalidState { count, .. } if count == -2.0));
    }
}
