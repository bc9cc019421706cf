//! Circuit intermediate representation.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;

/// An ordered gate list plus qubit count.
///
/// Gate order is execution order. `depth` starts unset and is filled in by
/// the optimizer; it is never part of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    pub name: String,
    /// Number of qubit wires; an exclusive upper bound on wire indices.
    qubits: u32,
    /// Requested shot count, if the caller specified one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
    /// The gates, in execution order.
    gates: Vec<Gate>,
    /// Critical-path depth under ASAP layering. Set by the optimizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>, qubits: u32) -> IrResult<Self> {
        let name = name.into();
        if qubits == 0 {
            return Err(IrError::EmptyRegister(name));
        }
        Ok(Self {
            name,
            qubits,
            shots: None,
            gates: Vec::new(),
            depth: None,
        })
    }

    /// Create a circuit from an existing gate list, validating it.
    pub fn with_gates(
        name: impl Into<String>,
        qubits: u32,
        gates: Vec<Gate>,
    ) -> IrResult<Self> {
        let mut circuit = Self::new(name, qubits)?;
        circuit.gates = gates;
        circuit.validate()?;
        Ok(circuit)
    }

    /// Parse a circuit from its JSON description and validate it.
    ///
    /// Structural errors are rejected here, before any optimization.
    pub fn from_json(json: &str) -> IrResult<Self> {
        let circuit: Circuit = serde_json::from_str(json)?;
        circuit.validate()?;
        Ok(circuit)
    }

    /// Get the number of qubit wires.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.qubits
    }

    /// Replace the qubit count.
    ///
    /// Callers must keep every referenced wire index below the new count.
    pub fn set_num_qubits(&mut self, qubits: u32) {
        debug_assert!(
            self.gates.iter().flat_map(Gate::wires).all(|w| w < qubits),
            "wire index out of range after qubit count change"
        );
        self.qubits = qubits;
    }

    /// Get the gates in execution order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get mutable access to the gate list.
    pub fn gates_mut(&mut self) -> &mut Vec<Gate> {
        &mut self.gates
    }

    /// Get the number of gates.
    #[inline]
    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Check if the circuit has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Append a gate, checking its profile and wire range.
    pub fn push(&mut self, gate: Gate) -> IrResult<&mut Self> {
        gate.validate()?;
        for wire in gate.wires() {
            if wire >= self.qubits {
                return Err(IrError::WireOutOfRange {
                    op: gate.op.name(),
                    wire,
                    qubits: self.qubits,
                });
            }
        }
        self.gates.push(gate);
        Ok(self)
    }

    /// Validate every gate against its profile and the qubit range.
    ///
    /// Used to reject malformed input (e.g. after deserialization) before
    /// it reaches the optimizer.
    pub fn validate(&self) -> IrResult<()> {
        if self.qubits == 0 {
            return Err(IrError::EmptyRegister(self.name.clone()));
        }
        for gate in &self.gates {
            gate.validate()?;
            for wire in gate.wires() {
                if wire >= self.qubits {
                    return Err(IrError::WireOutOfRange {
                        op: gate.op.name(),
                        wire,
                        qubits: self.qubits,
                    });
                }
            }
        }
        Ok(())
    }

    /// Compute basic circuit metrics.
    pub fn metrics(&self) -> CircuitMetrics {
        CircuitMetrics {
            gate_count: self.gates.len(),
            depth: self.depth,
            qubits: self.qubits,
        }
    }

    // =========================================================================
    // Gate builder shorthands
    // =========================================================================

    /// Apply a Hadamard gate.
    pub fn h(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Gate::h(qubit))
    }

    /// Apply a Pauli-X gate.
    pub fn x(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Gate::x(qubit))
    }

    /// Apply a Pauli-Z gate.
    pub fn z(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Gate::z(qubit))
    }

    /// Apply a T gate.
    pub fn t(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Gate::t(qubit))
    }

    /// Apply a T-dagger gate.
    pub fn tdg(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Gate::tdg(qubit))
    }

    /// Apply an X-axis rotation.
    pub fn rx(&mut self, qubit: u32, theta: f64) -> IrResult<&mut Self> {
        self.push(Gate::rx(qubit, theta))
    }

    /// Apply a Y-axis rotation.
    pub fn ry(&mut self, qubit: u32, theta: f64) -> IrResult<&mut Self> {
        self.push(Gate::ry(qubit, theta))
    }

    /// Apply a Z-axis rotation.
    pub fn rz(&mut self, qubit: u32, theta: f64) -> IrResult<&mut Self> {
        self.push(Gate::rz(qubit, theta))
    }

    /// Apply a controlled-X gate.
    pub fn cx(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.push(Gate::cx(control, target)?)
    }

    /// Apply a controlled-Z gate.
    pub fn cz(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.push(Gate::cz(control, target)?)
    }

    /// Measure a qubit.
    pub fn measure(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Gate::measure(qubit))
    }

    /// Insert a global barrier.
    pub fn barrier(&mut self) -> IrResult<&mut Self> {
        self.push(Gate::barrier())
    }
}

/// Basic metrics of a circuit, persisted at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircuitMetrics {
    /// Total gate count.
    pub gate_count: usize,
    /// ASAP depth, if the optimizer has run.
    pub depth: Option<u32>,
    /// Qubit count.
    pub qubits: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::OpKind;

    #[test]
    fn test_circuit_builder() {
        let mut circuit = Circuit::new("bell", 2).unwrap();
        circuit.h(0).unwrap().cx(0, 1).unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.gate_count(), 2);
        assert_eq!(circuit.gates()[0].op, OpKind::H);
        assert_eq!(circuit.gates()[1].op, OpKind::CX);
        assert!(circuit.depth.is_none());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            Circuit::new("empty", 0),
            Err(IrError::EmptyRegister(_))
        ));
    }

    #[test]
    fn test_wire_range_enforced() {
        let mut circuit = Circuit::new("small", 2).unwrap();
        let err = circuit.h(2).unwrap_err();
        assert!(matches!(
            err,
            IrError::WireOutOfRange {
                op: "h",
                wire: 2,
                qubits: 2
            }
        ));
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"{
            "name": "demo",
            "qubits": 2,
            "shots": 512,
            "gates": [
                {"op": "h", "target": 0},
                {"op": "CNOT", "target": 1, "control": 0},
                {"op": "rz", "target": 1, "params": {"theta": 0.5}}
            ]
        }"#;
        let circuit = Circuit::from_json(json).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.shots, Some(512));
        assert_eq!(circuit.gate_count(), 3);
        assert_eq!(circuit.gates()[1].op, OpKind::CX);

        // Out-of-range wire is a structural error, not silently repaired.
        let bad = r#"{"name": "bad", "qubits": 1, "gates": [{"op": "x", "target": 3}]}"#;
        assert!(matches!(
            Circuit::from_json(bad),
            Err(IrError::WireOutOfRange { .. })
        ));

        // Missing required parameter caught after deserialization.
        let unparam = r#"{"name": "bad", "qubits": 1, "gates": [{"op": "rx", "target": 0}]}"#;
        assert!(matches!(
            Circuit::from_json(unparam),
            Err(IrError::MissingParam { .. })
        ));
    }

    #[test]
    fn test_metrics() {
        let mut circuit = Circuit::new("m", 3).unwrap();
        circuit.h(0).unwrap().cx(0, 1).unwrap();
        circuit.depth = Some(2);

        let metrics = circuit.metrics();
        assert_eq!(metrics.gate_count, 2);
        assert_eq!(metrics.depth, Some(2));
        assert_eq!(metrics.qubits, 3);
    }

    #[test]
    fn test_json_round_trip() {
        let mut circuit = Circuit::new("rt", 2).unwrap();
        circuit.h(0).unwrap().cx(0, 1).unwrap().barrier().unwrap();
        circuit.measure(0).unwrap().measure(1).unwrap();

        let json = serde_json::to_string(&circuit).unwrap();
        let back = Circuit::from_json(&json).unwrap();
        assert_eq!(circuit, back);
    }
}
