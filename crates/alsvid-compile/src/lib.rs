//! Alsvid Circuit Optimization Pipeline
//!
//! This crate rewrites a [`Circuit`](alsvid_ir::Circuit) into an equivalent,
//! smaller circuit with compacted wire indices and a computed depth. It uses
//! a pass-based architecture: each pass is a local, provably-safe rewrite,
//! and the [`PassManager`] runs them in a fixed order.
//!
//! # Pipeline
//!
//! ```text
//! Input gate list
//!       │
//!       ├── CancelInverses     pop adjacent inverse pairs
//!       ├── FuseRotations      sum adjacent same-axis angles mod 2π
//!       ├── CommuteRotations   move Rz across CX/CZ to expose fusions
//!       ├── RemapWires         compact wire indices in first-use order
//!       └── ComputeDepth       ASAP layering → circuit.depth
//!       │
//!       ▼
//! Optimized gate list
//! ```
//!
//! # Example
//!
//! ```rust
//! use alsvid_compile::optimize;
//! use alsvid_ir::Circuit;
//!
//! let mut circuit = Circuit::new("demo", 2).unwrap();
//! circuit.h(0).unwrap();
//! circuit.h(0).unwrap();          // cancels with the first H
//! circuit.cx(0, 1).unwrap();
//!
//! optimize(&mut circuit).unwrap();
//!
//! assert_eq!(circuit.gate_count(), 1);
//! assert_eq!(circuit.depth, Some(1));
//! ```
//!
//! Structurally valid input never fails; malformed IR must be rejected by
//! `Circuit::validate` before it reaches the pipeline.

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, optimize, optimized};
pub use pass::Pass;
