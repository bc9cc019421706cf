//! Wire index remapping.

use alsvid_ir::Circuit;
use rustc_hash::FxHashMap;

use crate::error::CompileResult;
use crate::pass::Pass;

/// Compact wire indices in first-use order.
///
/// Each originally-referenced wire gets a new index assigned greedily in
/// first-seen order starting at 0; the qubit count becomes the number of
/// distinct referenced wires. A non-empty circuit whose gates reference no
/// specific wires (global barriers only) keeps its original qubit count —
/// those operations act on all wires by convention. A wholly empty circuit
/// collapses to zero qubits.
pub struct RemapWires;

impl Pass for RemapWires {
    fn name(&self) -> &'static str {
        "RemapWires"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        let original_qubits = circuit.num_qubits();
        let mut mapping: FxHashMap<u32, u32> = FxHashMap::default();
        let mut next_wire: u32 = 0;
        let mut has_global = false;

        for gate in circuit.gates_mut() {
            if gate.op.is_global() {
                has_global = true;
            }
            if let Some(target) = gate.target {
                let mapped = *mapping.entry(target).or_insert_with(|| {
                    let wire = next_wire;
                    next_wire += 1;
                    wire
                });
                gate.target = Some(mapped);
            }
            if let Some(control) = gate.control {
                let mapped = *mapping.entry(control).or_insert_with(|| {
                    let wire = next_wire;
                    next_wire += 1;
                    wire
                });
                gate.control = Some(mapped);
            }
        }

        let qubits = if mapping.is_empty() {
            if has_global { original_qubits } else { 0 }
        } else {
            mapping.len() as u32
        };
        circuit.set_num_qubits(qubits);

        Ok(())
    }
}
