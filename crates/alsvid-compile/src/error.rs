//! Error types for the compilation pipeline.

use alsvid_ir::IrError;
use thiserror::Error;

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during optimization.
///
/// Structurally valid input never produces a user-facing error; these
/// surface defects and malformed input rejected before the pipeline runs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Structural error in the input IR.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// A pass violated an internal invariant.
    #[error("Internal invariant violated in pass '{pass}': {message}")]
    InvariantViolation {
        /// Name of the offending pass.
        pass: &'static str,
        /// What went wrong.
        message: String,
    },
}
