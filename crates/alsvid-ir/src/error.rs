//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Operation name not recognized.
    #[error("Unknown operation: '{0}'")]
    UnknownOp(String),

    /// Operation recognized but not expressible in the gate record.
    #[error("Unsupported operation '{op}': {reason}")]
    UnsupportedOp {
        /// The operation name as given.
        op: String,
        /// Why it cannot be represented.
        reason: String,
    },

    /// Operation requires a target wire.
    #[error("Gate '{0}' requires a target wire")]
    MissingTarget(&'static str),

    /// Global operation carries a target wire.
    #[error("Global operation '{0}' must not have a target wire")]
    UnexpectedTarget(&'static str),

    /// Controlled operation is missing its control wire.
    #[error("Gate '{0}' requires a control wire")]
    MissingControl(&'static str),

    /// Single-wire operation carries a control wire.
    #[error("Gate '{0}' must not have a control wire")]
    UnexpectedControl(&'static str),

    /// Parametric operation is missing a required parameter.
    #[error("Gate '{op}' requires parameter '{name}'")]
    MissingParam {
        /// Name of the gate.
        op: &'static str,
        /// Name of the missing parameter.
        name: &'static str,
    },

    /// Non-parametric operation carries parameters.
    #[error("Gate '{0}' does not take parameters")]
    UnexpectedParams(&'static str),

    /// Control and target refer to the same wire.
    #[error("Gate '{op}': control and target are both wire {wire}")]
    SameWire {
        /// Name of the gate.
        op: &'static str,
        /// The duplicated wire index.
        wire: u32,
    },

    /// Wire index exceeds the circuit's qubit count.
    #[error("Gate '{op}' references wire {wire}, circuit has {qubits} qubits")]
    WireOutOfRange {
        /// Name of the gate.
        op: &'static str,
        /// The out-of-range wire index.
        wire: u32,
        /// The circuit's declared qubit count.
        qubits: u32,
    },

    /// Circuit declared with zero qubits.
    #[error("Circuit '{0}' must declare at least one qubit")]
    EmptyRegister(String),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
