//! Alsvid Device Capability Layer
//!
//! This crate defines the interface between the scheduler and execution
//! backends. A backend implements the [`Device`] trait — the three-step
//! `compile → run → monitor` lifecycle — and is registered by name in a
//! [`DeviceRegistry`] at startup.
//!
//! The scheduler consumes devices opaquely: workers look up the device
//! named in a job's payload, lower the instruction stream with `compile`,
//! execute with `run`, and report with `monitor`. Backends accessed through
//! vendor SDKs live in their own crates and only need to implement
//! [`Device`].
//!
//! # Example: Implementing a Device
//!
//! ```rust
//! use alsvid_hal::{CompiledCircuit, Counts, Device, ExecutionResult, HalResult};
//! use async_trait::async_trait;
//!
//! struct ConstantDevice;
//!
//! #[async_trait]
//! impl Device for ConstantDevice {
//!     fn name(&self) -> &str { "constant" }
//!
//!     fn max_qubits(&self) -> u32 { 2 }
//!
//!     async fn compile(&self, source: &str) -> HalResult<CompiledCircuit> {
//!         Ok(CompiledCircuit::new("constant", source))
//!     }
//!
//!     async fn run(&self, _compiled: &CompiledCircuit) -> HalResult<ExecutionResult> {
//!         let counts = Counts::from_pairs([("00", 1024u64)]);
//!         Ok(ExecutionResult::new(counts, 1024))
//!     }
//! }
//! ```

pub mod device;
pub mod error;
pub mod registry;
pub mod result;

pub use device::{CompiledCircuit, Device};
pub use error::{HalError, HalResult};
pub use registry::DeviceRegistry;
pub use result::{Counts, ExecutionResult};
