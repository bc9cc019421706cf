//! ASAP depth computation.

use alsvid_ir::Circuit;
use rustc_hash::FxHashMap;

use crate::error::CompileResult;
use crate::pass::Pass;

/// Compute circuit depth via As-Soon-As-Possible layering.
///
/// Each wire carries a busy-until counter. A single-wire gate occupies one
/// layer starting at its wire's counter; a two-wire gate starts at the
/// maximum of both counters; a global barrier raises every wire to one past
/// the current maximum. Depth is the maximum finishing layer observed, 0
/// for an empty gate list.
pub struct ComputeDepth;

impl Pass for ComputeDepth {
    fn name(&self) -> &'static str {
        "ComputeDepth"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        // `floor` is the layer every untouched wire sits at; barriers raise
        // it so the map only has to track wires busy above the floor.
        let mut busy: FxHashMap<u32, u32> = FxHashMap::default();
        let mut floor: u32 = 0;
        let mut depth: u32 = 0;

        for gate in circuit.gates() {
            if gate.op.is_global() {
                let current_max = busy.values().copied().max().unwrap_or(0).max(floor);
                floor = current_max + 1;
                busy.clear();
                depth = depth.max(floor);
            } else {
                let start = gate
                    .wires()
                    .map(|w| busy.get(&w).copied().unwrap_or(floor))
                    .max()
                    .unwrap_or(floor);
                let finish = start + 1;
                for wire in gate.wires() {
                    busy.insert(wire, finish);
                }
                depth = depth.max(finish);
            }
        }

        circuit.depth = Some(depth);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_ir::Gate;

    fn depth_of(gates: Vec<Gate>) -> u32 {
        let mut circuit = Circuit::with_gates("depth", 8, gates).unwrap();
        ComputeDepth.run(&mut circuit).unwrap();
        circuit.depth.unwrap()
    }

    #[test]
    fn test_empty_circuit_has_zero_depth() {
        assert_eq!(depth_of(vec![]), 0);
    }

    #[test]
    fn test_chain_depth_equals_length() {
        let gates = (0..5).map(|_| Gate::h(0)).collect();
        assert_eq!(depth_of(gates), 5);
    }

    #[test]
    fn test_parallel_gates_share_a_layer() {
        let gates = (0..5).map(Gate::h).collect();
        assert_eq!(depth_of(gates), 1);
    }

    #[test]
    fn test_two_qubit_gate_joins_wires() {
        // Wire 0 busy until 2, wire 1 until 1; CX starts at 2, finishes at 3.
        assert_eq!(
            depth_of(vec![
                Gate::h(0),
                Gate::h(0),
                Gate::h(1),
                Gate::cx(0, 1).unwrap(),
            ]),
            3
        );
    }

    #[test]
    fn test_two_qubit_then_single() {
        assert_eq!(
            depth_of(vec![Gate::cx(0, 1).unwrap(), Gate::h(1)]),
            2
        );
    }

    #[test]
    fn test_barrier_synchronizes_all_wires() {
        // H H on wire 0 → counters {0: 2}; barrier raises every wire to 3;
        // the H on wire 1 then occupies layer 3 → finishing layer 4.
        assert_eq!(
            depth_of(vec![Gate::h(0), Gate::h(0), Gate::barrier(), Gate::h(1)]),
            4
        );
    }

    #[test]
    fn test_barrier_alone_counts_as_a_layer() {
        assert_eq!(depth_of(vec![Gate::barrier()]), 1);
    }

    #[test]
    fn test_depth_overwrites_stale_value() {
        let mut circuit = Circuit::with_gates("stale", 2, vec![Gate::h(0)]).unwrap();
        circuit.depth = Some(99);
        ComputeDepth.run(&mut circuit).unwrap();
        assert_eq!(circuit.depth, Some(1));
    }
}
