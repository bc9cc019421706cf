//! Device capability trait.
//!
//! The [`Device`] trait is the three-step execution contract consumed by the
//! scheduler's workers:
//!
//! ```text
//!   compile(source) ──→ run(compiled) ──→ monitor(result)
//!       (async)            (async)       (async, best-effort)
//! ```
//!
//! ## Design principles
//!
//! - **Async-native**: all execution methods are async; `run` in particular
//!   may take nontrivial wall-clock time.
//! - **Thread-safe**: `Send + Sync` bound enables shared ownership across
//!   worker tasks.
//! - **Infallible introspection**: `name()` and `max_qubits()` are
//!   synchronous — a device that cannot report them without I/O is not
//!   correctly initialized.
//! - **Uniform failure**: the scheduler treats an error from any of the
//!   three steps as one execution failure for retry purposes; `monitor`
//!   implementations should therefore be side-effect-only and swallow their
//!   own transient failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HalResult;
use crate::result::ExecutionResult;

/// An instruction stream lowered to a device-native program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledCircuit {
    /// Name of the device that produced this form.
    pub device: String,
    /// The device-native program text.
    pub program: String,
}

impl CompiledCircuit {
    /// Create a compiled circuit.
    pub fn new(device: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            program: program.into(),
        }
    }
}

/// Trait for execution devices.
///
/// Implementations wrap one backend (a simulator, a vendor SDK, …) behind
/// the compile/run/monitor lifecycle. Devices are registered in a
/// [`DeviceRegistry`](crate::DeviceRegistry) and looked up by name.
#[async_trait]
pub trait Device: Send + Sync {
    /// Get the name of this device.
    fn name(&self) -> &str;

    /// Get the number of qubit wires this device supports.
    fn max_qubits(&self) -> u32;

    /// Lower an instruction stream to the device-native form.
    ///
    /// MUST validate the stream against device constraints before accepting
    /// it (at minimum the wire capacity).
    async fn compile(&self, source: &str) -> HalResult<CompiledCircuit>;

    /// Execute a compiled program.
    ///
    /// May take nontrivial wall-clock time and may fail on any transient or
    /// permanent backend condition.
    async fn run(&self, compiled: &CompiledCircuit) -> HalResult<ExecutionResult>;

    /// Report on a finished execution.
    ///
    /// Best-effort and side-effect-only; returns a human-readable summary.
    /// The default implementation summarizes the most frequent outcome.
    async fn monitor(&self, result: &ExecutionResult) -> HalResult<String> {
        let summary = match result.counts.most_frequent() {
            Some((bitstring, count)) => format!(
                "{}: {} shots, top outcome {} ({})",
                self.name(),
                result.shots,
                bitstring,
                count
            ),
            None => format!("{}: {} shots, no counts", self.name(), result.shots),
        };
        tracing::info!("{summary}");
        Ok(summary)
    }
}
