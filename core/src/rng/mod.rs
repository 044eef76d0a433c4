//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, deterministic random number
//! generation. All randomness in the stochastic dynamics MUST go through
//! this module; the generator is instance-local so concurrent simulations
//! never share state.

mod xorshift;

pub use xorshift::RngManager;
