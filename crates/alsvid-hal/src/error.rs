//! Error types for the device capability layer.

use thiserror::Error;

/// Errors that can occur in device operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// No device registered under the requested name.
    #[error("No device registered with name '{0}'")]
    DeviceNotFound(String),

    /// The device rejected the instruction stream.
    #[error("Compilation failed: {0}")]
    CompilationFailed(String),

    /// Execution failed on the device.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Monitoring step failed.
    #[error("Monitoring failed: {0}")]
    MonitoringFailed(String),

    /// Program exceeds the device's wire capacity.
    #[error("Program needs {qubits} qubits, device '{device}' supports {max_qubits}")]
    CircuitTooLarge {
        /// The device name.
        device: String,
        /// Qubits required by the program.
        qubits: u32,
        /// Qubits the device supports.
        max_qubits: u32,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic device error.
    #[error("Device error: {0}")]
    Device(String),
}

/// Result type for device operations.
pub type HalResult<T> = Result<T, HalError>;
