//! The decode → simulate → encode pipeline.
//!
//! This is the in-process entry point mirrored by the C boundary: one
//! parameter document in, one result document out. All three error
//! classes collapse into [`RunError`], which keeps the class visible for
//! the structured `error` field and the integer status entry point.

use crate::config::{self, DecodeError};
use crate::engine::{Engine, SimulationError};
use crate::output::{self, EncodeError, ResultDocument};
use thiserror::Error;

/// Hand-written last-resort document, used only if serializing a failure
/// report itself fails.
const FALLBACK_ERROR_JSON: &str = concat!(
    r#"{"schema_version":1,"#,
    r#""error":{"kind":"encode","message":"result serialization failed"},"#,
    r#""steps":null,"stochastic":null,"cohorts":null,"params_digest":null,"#,
    r#""final":null,"trajectory":null}"#
);

/// Any failure of the pipeline.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl RunError {
    /// Error class name, as carried in the document's `error.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Decode(_) => "decode",
            RunError::Simulation(_) => "simulation",
            RunError::Encode(_) => "encode",
        }
    }

    /// Reserved integer code for the status entry point:
    /// 1 decode, 2 simulation, 3 encode.
    pub fn code(&self) -> i32 {
        match self {
            RunError::Decode(_) => 1,
            RunError::Simulation(_) => 2,
            RunError::Encode(_) => 3,
        }
    }
}

/// Run a simulation from a parameter document.
///
/// # Example
/// ```
/// use beecs_core_rs::run;
///
/// let doc = run(r#"{"initial":{"egg":10},"steps":0}"#).unwrap();
/// assert_eq!(doc.final_counts.unwrap()["egg"], 10.0);
/// ```
pub fn run(params_json: &str) -> Result<ResultDocument, RunError> {
    let config = config::decode(params_json)?;
    let digest = output::params_digest(params_json);

    let mut engine = Engine::new(config);
    engine.run()?;

    let doc = ResultDocument::success(
        engine.config(),
        engine.state(),
        engine.trajectory(),
        digest,
    )?;
    Ok(doc)
}

/// Run a simulation and always produce a result document string.
///
/// Failures are reported through the document's structured `error` field
/// instead of being collapsed into a bare sentinel; this is what both
/// boundary entry points and the CLI render.
pub fn run_to_json(params_json: &str) -> String {
    match run(params_json) {
        Ok(doc) => match doc.to_json() {
            Ok(json) => json,
            Err(err) => failure_json("encode", &err.to_string()),
        },
        Err(err) => failure_json(err.kind(), &err.to_string()),
    }
}

/// Render a failure document, falling back to a canned string if even
/// that cannot be serialized.
pub(crate) fn failure_json(kind: &str, message: &str) -> String {
    ResultDocument::failure(kind, message)
        .to_json()
        .unwrap_or_else(|_| FALLBACK_ERROR_JSON.to_string())
}
