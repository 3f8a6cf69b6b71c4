//! The closed opcode table of the Alsvid ISA.
//!
//! Every operation the hardware accepts is listed here, together with its
//! static shape: how many quantized parameters it carries and how many qubit
//! operands it addresses. The discriminant values are the wire encoding and
//! must never be reassigned between releases.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IsaError, IsaResult};

/// One hardware operation.
///
/// Three families share the table:
///
/// - *Session and lifecycle* control (`0x01`–`0x07`): bracket a register
///   allocation and steer per-qubit state preparation and measurement.
/// - *Parameterized gates* (`0x10`–`0x19`): rotations carrying fixed-point
///   quantized angles in the parameter fields.
/// - *Constant gates* (`0x20`–`0x31`): fixed unitaries with no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    // Session / lifecycle
    /// Open a session. Fails if one is already open.
    StartSession = 0x01,
    /// Close the session, discarding any unmeasured qubits.
    EndSession = 0x02,
    /// Allocate the register and prepare every qubit in |0⟩.
    PrepareAll = 0x03,
    /// Re-prepare a single qubit in |0⟩.
    Prepare = 0x04,
    /// Measure one qubit, optionally pre-rotated by the two angle parameters.
    Measure = 0x05,
    /// Load page-offset register 0 (qubit slot 0 translation).
    SetOffset0 = 0x06,
    /// Load page-offset register 1 (qubit slot 1 translation).
    SetOffset1 = 0x07,

    // Parameterized gates
    /// Rotation about X by one quantized angle.
    Rx = 0x10,
    /// Rotation about Y by one quantized angle.
    Ry = 0x11,
    /// Rotation about Z by one quantized angle.
    Rz = 0x12,
    /// Phased rotation R(θ, φ) = Rz(φ)·Rx(θ)·Rz(−φ); carries both angles.
    R = 0x13,
    /// Phase gate diag(1, e^{iθ}).
    P = 0x14,
    /// Two-qubit XX rotation.
    Rxx = 0x18,
    /// Two-qubit ZZ rotation.
    Rzz = 0x19,

    // Constant gates
    /// Identity; a classical no-op on the wire.
    Id = 0x20,
    /// Pauli-X.
    X = 0x21,
    /// Pauli-Y.
    Y = 0x22,
    /// Pauli-Z.
    Z = 0x23,
    /// Hadamard.
    H = 0x24,
    /// S gate (sqrt(Z)).
    S = 0x25,
    /// S-dagger.
    Sdg = 0x26,
    /// T gate (fourth root of Z).
    T = 0x27,
    /// T-dagger.
    Tdg = 0x28,
    /// sqrt(X) gate.
    SqrtX = 0x29,
    /// Composite S·X helper gate.
    Sx = 0x2A,
    /// Composite S·Y helper gate.
    Sy = 0x2B,
    /// Controlled-X (CNOT); control in slot 0, target in slot 1.
    Cnot = 0x30,
    /// SWAP.
    Swap = 0x31,
}

impl Opcode {
    /// Every opcode, in wire order. Useful for exhaustive table tests.
    pub const ALL: [Opcode; 28] = [
        Opcode::StartSession,
        Opcode::EndSession,
        Opcode::PrepareAll,
        Opcode::Prepare,
        Opcode::Measure,
        Opcode::SetOffset0,
        Opcode::SetOffset1,
        Opcode::Rx,
        Opcode::Ry,
        Opcode::Rz,
        Opcode::R,
        Opcode::P,
        Opcode::Rxx,
        Opcode::Rzz,
        Opcode::Id,
        Opcode::X,
        Opcode::Y,
        Opcode::Z,
        Opcode::H,
        Opcode::S,
        Opcode::Sdg,
        Opcode::T,
        Opcode::Tdg,
        Opcode::SqrtX,
        Opcode::Sx,
        Opcode::Sy,
        Opcode::Cnot,
        Opcode::Swap,
    ];

    /// The wire byte for this opcode.
    #[inline]
    pub fn to_wire(self) -> u8 {
        self as u8
    }

    /// Look a wire byte up in the table.
    ///
    /// Rejects any byte outside the closed table; this is the only place an
    /// opcode byte is ever interpreted.
    pub fn from_wire(byte: u8) -> IsaResult<Self> {
        let opcode = match byte {
            0x01 => Opcode::StartSession,
            0x02 => Opcode::EndSession,
            0x03 => Opcode::PrepareAll,
            0x04 => Opcode::Prepare,
            0x05 => Opcode::Measure,
            0x06 => Opcode::SetOffset0,
            0x07 => Opcode::SetOffset1,
            0x10 => Opcode::Rx,
            0x11 => Opcode::Ry,
            0x12 => Opcode::Rz,
            0x13 => Opcode::R,
            0x14 => Opcode::P,
            0x18 => Opcode::Rxx,
            0x19 => Opcode::Rzz,
            0x20 => Opcode::Id,
            0x21 => Opcode::X,
            0x22 => Opcode::Y,
            0x23 => Opcode::Z,
            0x24 => Opcode::H,
            0x25 => Opcode::S,
            0x26 => Opcode::Sdg,
            0x27 => Opcode::T,
            0x28 => Opcode::Tdg,
            0x29 => Opcode::SqrtX,
            0x2A => Opcode::Sx,
            0x2B => Opcode::Sy,
            0x30 => Opcode::Cnot,
            0x31 => Opcode::Swap,
            other => return Err(IsaError::UnknownOpcode(other)),
        };
        Ok(opcode)
    }

    /// Number of quantized parameters this opcode carries.
    #[inline]
    pub fn num_params(self) -> usize {
        match self {
            Opcode::Rx | Opcode::Ry | Opcode::Rz | Opcode::P | Opcode::Rxx | Opcode::Rzz => 1,
            Opcode::R | Opcode::Measure => 2,
            Opcode::SetOffset0 | Opcode::SetOffset1 => 1,
            _ => 0,
        }
    }

    /// Number of qubit operands this opcode addresses.
    #[inline]
    pub fn num_qubits(self) -> usize {
        match self {
            Opcode::StartSession
            | Opcode::EndSession
            | Opcode::PrepareAll
            | Opcode::SetOffset0
            | Opcode::SetOffset1 => 0,

            Opcode::Prepare
            | Opcode::Measure
            | Opcode::Rx
            | Opcode::Ry
            | Opcode::Rz
            | Opcode::R
            | Opcode::P
            | Opcode::Id
            | Opcode::X
            | Opcode::Y
            | Opcode::Z
            | Opcode::H
            | Opcode::S
            | Opcode::Sdg
            | Opcode::T
            | Opcode::Tdg
            | Opcode::SqrtX
            | Opcode::Sx
            | Opcode::Sy => 1,

            Opcode::Rxx | Opcode::Rzz | Opcode::Cnot | Opcode::Swap => 2,
        }
    }

    /// Check if this opcode addresses two qubits.
    #[inline]
    pub fn is_dual(self) -> bool {
        self.num_qubits() == 2
    }

    /// Check if this opcode carries at least one parameter.
    #[inline]
    pub fn has_params(self) -> bool {
        self.num_params() > 0
    }

    /// Check if this opcode is a gate (as opposed to session/lifecycle
    /// control).
    pub fn is_gate(self) -> bool {
        !matches!(
            self,
            Opcode::StartSession
                | Opcode::EndSession
                | Opcode::PrepareAll
                | Opcode::Prepare
                | Opcode::Measure
                | Opcode::SetOffset0
                | Opcode::SetOffset1
        )
    }

    /// Assembly-style mnemonic for listings.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::StartSession => "start_session",
            Opcode::EndSession => "end_session",
            Opcode::PrepareAll => "prepare_all",
            Opcode::Prepare => "prepare",
            Opcode::Measure => "measure",
            Opcode::SetOffset0 => "set_offset_0",
            Opcode::SetOffset1 => "set_offset_1",
            Opcode::Rx => "rx",
            Opcode::Ry => "ry",
            Opcode::Rz => "rz",
            Opcode::R => "r",
            Opcode::P => "p",
            Opcode::Rxx => "rxx",
            Opcode::Rzz => "rzz",
            Opcode::Id => "id",
            Opcode::X => "x",
            Opcode::Y => "y",
            Opcode::Z => "z",
            Opcode::H => "h",
            Opcode::S => "s",
            Opcode::Sdg => "sdg",
            Opcode::T => "t",
            Opcode::Tdg => "tdg",
            Opcode::SqrtX => "sqrt_x",
            Opcode::Sx => "sx",
            Opcode::Sy => "sy",
            Opcode::Cnot => "cnot",
            Opcode::Swap => "swap",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_roundtrip_all() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_wire(op.to_wire()).unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_bytes_rejected() {
        for byte in [0x00u8, 0x08, 0x0F, 0x15, 0x1A, 0x2C, 0x32, 0xFF] {
            assert!(matches!(
                Opcode::from_wire(byte),
                Err(IsaError::UnknownOpcode(b)) if b == byte
            ));
        }
    }

    #[test]
    fn test_arity_table() {
        assert_eq!(Opcode::StartSession.num_params(), 0);
        assert_eq!(Opcode::StartSession.num_qubits(), 0);
        assert_eq!(Opcode::Measure.num_params(), 2);
        assert_eq!(Opcode::Measure.num_qubits(), 1);
        assert_eq!(Opcode::Rx.num_params(), 1);
        assert_eq!(Opcode::R.num_params(), 2);
        assert_eq!(Opcode::Cnot.num_qubits(), 2);
        assert!(Opcode::Rzz.is_dual());
        assert!(!Opcode::H.is_dual());
        assert!(Opcode::H.is_gate());
        assert!(!Opcode::SetOffset0.is_gate());
    }

    #[test]
    fn test_display_uses_mnemonic() {
        assert_eq!(Opcode::SqrtX.to_string(), "sqrt_x");
        assert_eq!(Opcode::Cnot.to_string(), "cnot");
    }
}
