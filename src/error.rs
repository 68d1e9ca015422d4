//! Simulation error type
//!
//! Guard misses in the sequencer are not errors; they surface as
//! `Transition::Ignored`. Everything here rejects a frame or a configuration
//! before any state is mutated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Frame step was negative, NaN or infinite.
    #[error("invalid simulation input: time step {0} must be finite and non-negative")]
    InvalidTimeStep(f32),
    /// A derived direction could not be normalized.
    #[error("invalid simulation input: {0} direction is degenerate or non-finite")]
    NonFiniteDirection(&'static str),
    /// Integrating the frame would leave a non-finite position or angle.
    #[error("invalid simulation input: step of {0}s drives the state out of range")]
    NonFiniteState(f32),
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Configuration JSON could not be parsed.
    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}
