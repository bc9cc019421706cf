//! Pass manager orchestrating the optimization pipeline.

use tracing::{debug, info, instrument};

use alsvid_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{CancelInverses, CommuteRotations, ComputeDepth, FuseRotations, RemapWires};

/// Manages and executes a sequence of optimization passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Create the standard five-pass pipeline.
    ///
    /// Cancel inverses → fuse rotations → commute rotations → remap wires
    /// → compute depth. Each pass consumes the previous pass's output.
    pub fn standard() -> Self {
        let mut pm = Self::new();
        pm.add_pass(CancelInverses);
        pm.add_pass(FuseRotations);
        pm.add_pass(CommuteRotations);
        pm.add_pass(RemapWires);
        pm.add_pass(ComputeDepth);
        pm
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit), fields(circuit = %circuit.name))]
    pub fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        info!(
            "Running {} passes on circuit with {} gates, {} qubits",
            self.passes.len(),
            circuit.gate_count(),
            circuit.num_qubits()
        );

        for pass in &self.passes {
            debug!("Running pass: {}", pass.name());
            pass.run(circuit)?;
            debug!("Pass {} completed, gates: {}", pass.name(), circuit.gate_count());
        }

        info!(
            "Optimization complete: {} gates, {} qubits, depth {:?}",
            circuit.gate_count(),
            circuit.num_qubits(),
            circuit.depth
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the standard pipeline on a circuit in place.
pub fn optimize(circuit: &mut Circuit) -> CompileResult<()> {
    PassManager::standard().run(circuit)
}

/// Run the standard pipeline on a circuit, returning the rewritten IR.
pub fn optimized(mut circuit: Circuit) -> CompileResult<Circuit> {
    optimize(&mut circuit)?;
    Ok(circuit)
}
