//! Quantum gate types.
//!
//! A [`Gate`] is the immutable unit of computation: an operation tag plus
//! optional target/control wires and optional named angle parameters. Every
//! tag maps to a fixed required-field profile that is enforced when the gate
//! is constructed, so downstream consumers (the optimizer, the emitter)
//! never see a structurally invalid gate.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{IrError, IrResult};

/// The angle parameter name carried by every parametric operation.
pub const THETA: &str = "theta";

/// Canonical operation tags.
///
/// Input names are case-normalized and alias-resolved by [`OpKind::parse`];
/// the rest of the stack only ever sees canonical tags, and [`OpKind::name`]
/// is the unique lowercase key used by the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,
    /// Phase gate.
    P,
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// Controlled rotation around X.
    CRx,
    /// Controlled rotation around Y.
    CRy,
    /// Controlled rotation around Z.
    CRz,
    /// Controlled phase gate.
    CP,
    /// SWAP gate. The second wire travels in the `control` field.
    Swap,
    /// Measurement in the computational basis.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Global synchronization barrier. The only operation without a target.
    Barrier,
}

impl OpKind {
    /// Parse an operation name, case-normalizing and resolving aliases.
    ///
    /// Aliases map to their canonical tag (`cnot → cx`, `phase`/`u1 → p`,
    /// `cphase`/`cu1 → cp`). Three-qubit operations are rejected: the
    /// single-control gate record cannot represent them.
    pub fn parse(name: &str) -> IrResult<Self> {
        let lower = name.to_ascii_lowercase();
        let op = match lower.as_str() {
            "h" => OpKind::H,
            "x" => OpKind::X,
            "y" => OpKind::Y,
            "z" => OpKind::Z,
            "s" => OpKind::S,
            "sdg" => OpKind::Sdg,
            "t" => OpKind::T,
            "tdg" => OpKind::Tdg,
            "rx" => OpKind::Rx,
            "ry" => OpKind::Ry,
            "rz" => OpKind::Rz,
            "p" | "phase" | "u1" => OpKind::P,
            "cx" | "cnot" => OpKind::CX,
            "cy" => OpKind::CY,
            "cz" => OpKind::CZ,
            "ch" => OpKind::CH,
            "crx" => OpKind::CRx,
            "cry" => OpKind::CRy,
            "crz" => OpKind::CRz,
            "cp" | "cphase" | "cu1" => OpKind::CP,
            "swap" => OpKind::Swap,
            "measure" => OpKind::Measure,
            "reset" => OpKind::Reset,
            "barrier" => OpKind::Barrier,
            "ccx" | "toffoli" | "cswap" | "fredkin" => {
                return Err(IrError::UnsupportedOp {
                    op: name.to_string(),
                    reason: "three-qubit operations are not representable".to_string(),
                });
            }
            _ => return Err(IrError::UnknownOp(name.to_string())),
        };
        Ok(op)
    }

    /// Get the canonical name of this operation.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            OpKind::H => "h",
            OpKind::X => "x",
            OpKind::Y => "y",
            OpKind::Z => "z",
            OpKind::S => "s",
            OpKind::Sdg => "sdg",
            OpKind::T => "t",
            OpKind::Tdg => "tdg",
            OpKind::Rx => "rx",
            OpKind::Ry => "ry",
            OpKind::Rz => "rz",
            OpKind::P => "p",
            OpKind::CX => "cx",
            OpKind::CY => "cy",
            OpKind::CZ => "cz",
            OpKind::CH => "ch",
            OpKind::CRx => "crx",
            OpKind::CRy => "cry",
            OpKind::CRz => "crz",
            OpKind::CP => "cp",
            OpKind::Swap => "swap",
            OpKind::Measure => "measure",
            OpKind::Reset => "reset",
            OpKind::Barrier => "barrier",
        }
    }

    /// Get the required-field profile for this operation.
    pub const fn profile(self) -> OpProfile {
        match self {
            OpKind::H
            | OpKind::X
            | OpKind::Y
            | OpKind::Z
            | OpKind::S
            | OpKind::Sdg
            | OpKind::T
            | OpKind::Tdg
            | OpKind::Measure
            | OpKind::Reset => OpProfile {
                needs_target: true,
                needs_control: false,
                param_names: &[],
            },

            OpKind::Rx | OpKind::Ry | OpKind::Rz | OpKind::P => OpProfile {
                needs_target: true,
                needs_control: false,
                param_names: &[THETA],
            },

            OpKind::CX | OpKind::CY | OpKind::CZ | OpKind::CH | OpKind::Swap => OpProfile {
                needs_target: true,
                needs_control: true,
                param_names: &[],
            },

            OpKind::CRx | OpKind::CRy | OpKind::CRz | OpKind::CP => OpProfile {
                needs_target: true,
                needs_control: true,
                param_names: &[THETA],
            },

            OpKind::Barrier => OpProfile {
                needs_target: false,
                needs_control: false,
                param_names: &[],
            },
        }
    }

    /// Get the algebraic inverse tag, if the operation has one.
    ///
    /// Self-inverse gates return themselves; the S/Sdg and T/Tdg pairs are
    /// mutual inverses. Parametric and non-unitary operations return `None`.
    pub fn inverse(self) -> Option<OpKind> {
        match self {
            OpKind::X
            | OpKind::Y
            | OpKind::Z
            | OpKind::H
            | OpKind::CX
            | OpKind::CY
            | OpKind::CZ
            | OpKind::CH
            | OpKind::Swap => Some(self),
            OpKind::S => Some(OpKind::Sdg),
            OpKind::Sdg => Some(OpKind::S),
            OpKind::T => Some(OpKind::Tdg),
            OpKind::Tdg => Some(OpKind::T),
            _ => None,
        }
    }

    /// Check if this is a single-qubit axis rotation (Rx, Ry, Rz).
    #[inline]
    pub fn is_rotation(self) -> bool {
        matches!(self, OpKind::Rx | OpKind::Ry | OpKind::Rz)
    }

    /// Check if this is a Z-axis single-qubit rotation.
    #[inline]
    pub fn is_z_rotation(self) -> bool {
        matches!(self, OpKind::Rz)
    }

    /// Check if this operation spans two wires.
    #[inline]
    pub fn is_two_wire(self) -> bool {
        self.profile().needs_control
    }

    /// Check if this operation acts on every wire by convention.
    #[inline]
    pub fn is_global(self) -> bool {
        matches!(self, OpKind::Barrier)
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for OpKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for OpKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        OpKind::parse(&name).map_err(serde::de::Error::custom)
    }
}

/// Required-field profile for an operation tag.
///
/// Consulted once at gate construction; rewrite passes preserve it by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpProfile {
    /// Whether the operation requires a target wire.
    pub needs_target: bool,
    /// Whether the operation requires a control wire.
    pub needs_control: bool,
    /// Names of required angle parameters.
    pub param_names: &'static [&'static str],
}

/// A single gate: operation tag, wires, and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The canonical operation tag.
    pub op: OpKind,
    /// Target wire index. Absent only for global operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
    /// Control wire index (second wire for symmetric two-wire gates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<u32>,
    /// Named angle parameters, in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<FxHashMap<String, f64>>,
}

impl Gate {
    /// Create a gate, enforcing the operation's required-field profile.
    pub fn new(
        op: OpKind,
        target: Option<u32>,
        control: Option<u32>,
        params: Option<FxHashMap<String, f64>>,
    ) -> IrResult<Self> {
        let gate = Self {
            op,
            target,
            control,
            params,
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Check this gate against its operation's profile.
    pub fn validate(&self) -> IrResult<()> {
        let name = self.op.name();
        let profile = self.op.profile();

        match (profile.needs_target, self.target) {
            (true, None) => return Err(IrError::MissingTarget(name)),
            (false, Some(_)) => return Err(IrError::UnexpectedTarget(name)),
            _ => {}
        }

        match (profile.needs_control, self.control) {
            (true, None) => return Err(IrError::MissingControl(name)),
            (false, Some(_)) => return Err(IrError::UnexpectedControl(name)),
            _ => {}
        }

        if let (Some(control), Some(target)) = (self.control, self.target) {
            if control == target {
                return Err(IrError::SameWire {
                    op: name,
                    wire: target,
                });
            }
        }

        if profile.param_names.is_empty() {
            if self.params.as_ref().is_some_and(|p| !p.is_empty()) {
                return Err(IrError::UnexpectedParams(name));
            }
        } else {
            for &param in profile.param_names {
                if !self.params.as_ref().is_some_and(|p| p.contains_key(param)) {
                    return Err(IrError::MissingParam { op: name, name: param });
                }
            }
        }

        Ok(())
    }

    fn single(op: OpKind, target: u32) -> Self {
        Self {
            op,
            target: Some(target),
            control: None,
            params: None,
        }
    }

    fn rotation(op: OpKind, target: u32, theta: f64) -> Self {
        let mut params = FxHashMap::default();
        params.insert(THETA.to_string(), theta);
        Self {
            op,
            target: Some(target),
            control: None,
            params: Some(params),
        }
    }

    fn two(op: OpKind, control: u32, target: u32) -> IrResult<Self> {
        if control == target {
            return Err(IrError::SameWire {
                op: op.name(),
                wire: target,
            });
        }
        Ok(Self {
            op,
            target: Some(target),
            control: Some(control),
            params: None,
        })
    }

    /// Hadamard gate.
    pub fn h(target: u32) -> Self {
        Self::single(OpKind::H, target)
    }

    /// Pauli-X gate.
    pub fn x(target: u32) -> Self {
        Self::single(OpKind::X, target)
    }

    /// Pauli-Y gate.
    pub fn y(target: u32) -> Self {
        Self::single(OpKind::Y, target)
    }

    /// Pauli-Z gate.
    pub fn z(target: u32) -> Self {
        Self::single(OpKind::Z, target)
    }

    /// S gate.
    pub fn s(target: u32) -> Self {
        Self::single(OpKind::S, target)
    }

    /// S-dagger gate.
    pub fn sdg(target: u32) -> Self {
        Self::single(OpKind::Sdg, target)
    }

    /// T gate.
    pub fn t(target: u32) -> Self {
        Self::single(OpKind::T, target)
    }

    /// T-dagger gate.
    pub fn tdg(target: u32) -> Self {
        Self::single(OpKind::Tdg, target)
    }

    /// X-axis rotation.
    pub fn rx(target: u32, theta: f64) -> Self {
        Self::rotation(OpKind::Rx, target, theta)
    }

    /// Y-axis rotation.
    pub fn ry(target: u32, theta: f64) -> Self {
        Self::rotation(OpKind::Ry, target, theta)
    }

    /// Z-axis rotation.
    pub fn rz(target: u32, theta: f64) -> Self {
        Self::rotation(OpKind::Rz, target, theta)
    }

    /// Phase gate.
    pub fn p(target: u32, theta: f64) -> Self {
        Self::rotation(OpKind::P, target, theta)
    }

    /// Controlled-X gate.
    pub fn cx(control: u32, target: u32) -> IrResult<Self> {
        Self::two(OpKind::CX, control, target)
    }

    /// Controlled-Y gate.
    pub fn cy(control: u32, target: u32) -> IrResult<Self> {
        Self::two(OpKind::CY, control, target)
    }

    /// Controlled-Z gate.
    pub fn cz(control: u32, target: u32) -> IrResult<Self> {
        Self::two(OpKind::CZ, control, target)
    }

    /// Controlled-Hadamard gate.
    pub fn ch(control: u32, target: u32) -> IrResult<Self> {
        Self::two(OpKind::CH, control, target)
    }

    /// Controlled Z-axis rotation.
    pub fn crz(control: u32, target: u32, theta: f64) -> IrResult<Self> {
        let mut gate = Self::two(OpKind::CRz, control, target)?;
        let mut params = FxHashMap::default();
        params.insert(THETA.to_string(), theta);
        gate.params = Some(params);
        Ok(gate)
    }

    /// Controlled phase gate.
    pub fn cp(control: u32, target: u32, theta: f64) -> IrResult<Self> {
        let mut gate = Self::two(OpKind::CP, control, target)?;
        let mut params = FxHashMap::default();
        params.insert(THETA.to_string(), theta);
        gate.params = Some(params);
        Ok(gate)
    }

    /// SWAP gate between two wires.
    pub fn swap(a: u32, b: u32) -> IrResult<Self> {
        Self::two(OpKind::Swap, a, b)
    }

    /// Measurement.
    pub fn measure(target: u32) -> Self {
        Self::single(OpKind::Measure, target)
    }

    /// Reset to |0⟩.
    pub fn reset(target: u32) -> Self {
        Self::single(OpKind::Reset, target)
    }

    /// Global barrier.
    pub fn barrier() -> Self {
        Self {
            op: OpKind::Barrier,
            target: None,
            control: None,
            params: None,
        }
    }

    /// Get the rotation angle, if present.
    pub fn theta(&self) -> Option<f64> {
        self.params.as_ref()?.get(THETA).copied()
    }

    /// Replace the rotation angle.
    pub fn set_theta(&mut self, theta: f64) {
        self.params
            .get_or_insert_with(FxHashMap::default)
            .insert(THETA.to_string(), theta);
    }

    /// Check if this gate carries any parameters.
    pub fn has_params(&self) -> bool {
        self.params.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Iterate over the wires this gate references.
    pub fn wires(&self) -> impl Iterator<Item = u32> + '_ {
        self.target.into_iter().chain(self.control)
    }

    /// Check if two gates act on the identical (target, control) pair.
    pub fn same_wires(&self, other: &Gate) -> bool {
        self.target == other.target && self.control == other.control
    }
}
