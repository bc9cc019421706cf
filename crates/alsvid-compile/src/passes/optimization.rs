//! Gate-level rewrite passes.

use std::f64::consts::{PI, TAU};

use alsvid_ir::{Circuit, Gate, OpKind};

use crate::error::CompileResult;
use crate::pass::Pass;

/// Tolerance for the wrapped shortest-distance-to-zero check.
const ANGLE_EPS: f64 = 1e-8;

/// Check whether an angle is the identity rotation under modulo-2π wrap.
fn is_wrapped_zero(angle: f64) -> bool {
    ((angle + PI).rem_euclid(TAU) - PI).abs() < ANGLE_EPS
}

/// Result of fusing two adjacent same-axis rotations.
pub(crate) enum Fusion {
    /// Replace the earlier gate's angle with the wrapped sum.
    Merged(f64),
    /// The sum is the identity; drop both gates.
    Identity,
}

/// Apply the rotation-fusion rule to a candidate pair.
///
/// Returns `None` unless `next` is an axis rotation whose operation and
/// (target, control) pair exactly match `prev`'s and both carry numeric
/// angles.
pub(crate) fn fuse_pair(prev: &Gate, next: &Gate) -> Option<Fusion> {
    if !next.op.is_rotation() || next.op != prev.op || !next.same_wires(prev) {
        return None;
    }
    let sum = (prev.theta()? + next.theta()?).rem_euclid(TAU);
    if is_wrapped_zero(sum) {
        Some(Fusion::Identity)
    } else {
        Some(Fusion::Merged(sum))
    }
}

/// Cancel adjacent inverse pairs.
///
/// Single forward scan using the output buffer as an implicit stack: a gate
/// whose algebraic inverse sits on top of the buffer, on the identical
/// (target, control) pair and with no parameters, pops it; everything else
/// pushes.
pub struct CancelInverses;

impl Pass for CancelInverses {
    fn name(&self) -> &'static str {
        "CancelInverses"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        let gates = std::mem::take(circuit.gates_mut());
        let mut out: Vec<Gate> = Vec::with_capacity(gates.len());

        for gate in gates {
            let cancels = out.last().is_some_and(|prev| {
                gate.op.inverse() == Some(prev.op)
                    && gate.same_wires(prev)
                    && !gate.has_params()
                    && !prev.has_params()
            });
            if cancels {
                out.pop();
            } else {
                out.push(gate);
            }
        }

        *circuit.gates_mut() = out;
        Ok(())
    }
}

/// Fuse adjacent same-axis rotations.
///
/// Angles sum modulo 2π into the earlier gate; a sum within [`ANGLE_EPS`]
/// of the identity (wrapped shortest-distance, not raw equality) drops the
/// fused gate entirely.
pub struct FuseRotations;

impl Pass for FuseRotations {
    fn name(&self) -> &'static str {
        "FuseRotations"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        let gates = std::mem::take(circuit.gates_mut());
        let mut out: Vec<Gate> = Vec::with_capacity(gates.len());

        for gate in gates {
            match out.last().and_then(|prev| fuse_pair(prev, &gate)) {
                Some(Fusion::Merged(theta)) => {
                    if let Some(prev) = out.last_mut() {
                        prev.set_theta(theta);
                    }
                }
                Some(Fusion::Identity) => {
                    out.pop();
                }
                None => out.push(gate),
            }
        }

        *circuit.gates_mut() = out;
        Ok(())
    }
}

/// Commute Z-axis rotations across two-qubit gates to expose fusions.
///
/// An Rz commutes with a CX on its control wire, and with a CZ on either
/// wire. The rotation migrates earlier across a maximal run of adjacent
/// commuting two-qubit gates, but only when the move lands it next to a
/// rotation it can fuse with; the fusion is applied immediately. Swapping
/// only when productive makes the pass idempotent.
pub struct CommuteRotations;

impl CommuteRotations {
    /// Check whether `rotation` commutes past `gate` when moved earlier.
    fn commutes_past(gate: &Gate, rotation: &Gate) -> bool {
        let Some(wire) = rotation.target else {
            return false;
        };
        match gate.op {
            OpKind::CX => gate.control == Some(wire),
            OpKind::CZ => gate.control == Some(wire) || gate.target == Some(wire),
            _ => false,
        }
    }
}

impl Pass for CommuteRotations {
    fn name(&self) -> &'static str {
        "CommuteRotations"
    }

    fn run(&self, circuit: &mut Circuit) -> CompileResult<()> {
        let gates = circuit.gates_mut();
        let mut i = 1;

        while i < gates.len() {
            if gates[i].op.is_z_rotation() {
                // Walk back across the run of two-qubit gates the rotation
                // commutes with.
                let mut j = i;
                while j > 0 && Self::commutes_past(&gates[j - 1], &gates[i]) {
                    j -= 1;
                }
                if j < i && j > 0 {
                    if let Some(outcome) = fuse_pair(&gates[j - 1], &gates[i]) {
                        gates.remove(i);
                        match outcome {
                            Fusion::Merged(theta) => gates[j - 1].set_theta(theta),
                            Fusion::Identity => {
                                gates.remove(j - 1);
                            }
                        }
                        // Re-scan from the disturbance point.
                        i = j.max(1);
                        continue;
                    }
                }
            }
            i += 1;
        }

        Ok(())
    }
}
