//! Alsvid Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing quantum
//! circuits in Alsvid: an ordered gate list plus qubit count, consumed and
//! rewritten by the optimizer in `alsvid-compile`.
//!
//! # Overview
//!
//! - **Gates**: [`Gate`] — one operation with a canonical [`OpKind`] tag,
//!   optional target/control wires, and optional named angle parameters.
//!   Every tag carries a static required-field profile enforced at
//!   construction.
//! - **Circuits**: [`Circuit`] — the IR proper: name, qubit count, gates in
//!   execution order, and the optimizer-computed depth.
//! - **Metrics**: [`CircuitMetrics`] — gate count / depth / qubit summary
//!   captured at submit time.
//!
//! Operation names are case-normalized and alias-resolved (`cnot → cx`,
//! `phase → p`, …) at the parse boundary, so every consumer downstream of
//! this crate sees exactly one canonical tag per operation.
//!
//! # Example: Building a Bell Pair
//!
//! ```rust
//! use alsvid_ir::Circuit;
//!
//! let mut circuit = Circuit::new("bell", 2).unwrap();
//! circuit.h(0).unwrap();
//! circuit.cx(0, 1).unwrap();
//! circuit.measure(0).unwrap();
//! circuit.measure(1).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.gate_count(), 4);
//! ```
//!
//! # Example: Ingesting JSON
//!
//! ```rust
//! use alsvid_ir::Circuit;
//!
//! let circuit = Circuit::from_json(r#"{
//!     "name": "demo",
//!     "qubits": 2,
//!     "gates": [
//!         {"op": "h", "target": 0},
//!         {"op": "CNOT", "target": 1, "control": 0}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(circuit.gates()[1].op.name(), "cx");
//! ```

pub mod circuit;
pub mod error;
pub mod gate;

pub use circuit::{Circuit, CircuitMetrics};
pub use error::{IrError, IrResult};
pub use gate::{Gate, OpKind, OpProfile, THETA};
