//! The 64-bit instruction-word codec.
//!
//! This module is the authoritative definition of the wire format. One word
//! encodes exactly one operation:
//!
//! ```text
//! bit 63                                                          bit 0
//! ┌────────┬────────────┬────────────┬────────────┬────────────┐
//! │ opcode │  param 0   │  param 1   │  qubit 0   │  qubit 1   │
//! │ 8 bits │  16 bits   │  16 bits   │  12 bits   │  12 bits   │
//! └────────┴────────────┴────────────┴────────────┴────────────┘
//! ```
//!
//! Fields beyond the opcode's declared arity are zero in every word the
//! encoder produces, and are discarded on decode. Angle parameters travel as
//! signed 16-bit fixed point with [`ANGLE_FRACTION_BITS`] fractional bits;
//! [`angle_to_fixed`] / [`fixed_to_angle`] are the only conversion routines.

use std::fmt;

use crate::error::{IsaError, IsaResult};
use crate::opcode::Opcode;

/// Width of one instruction word in bytes.
pub const WORD_BYTES: usize = 8;

/// Largest qubit index representable in an in-word qubit field.
pub const MAX_QUBIT_INDEX: u16 = 0x0FFF;

/// Fractional bits of the fixed-point angle representation.
///
/// 12 fractional bits give 4096 steps per radian, a resolution of
/// ~2.44 × 10⁻⁴ rad. The representable range ±(2¹⁵ − 1)/2¹² ≈ ±8 rad covers
/// the closed interval [−2π, 2π] without wraparound.
pub const ANGLE_FRACTION_BITS: u32 = 12;

const ANGLE_SCALE: f64 = (1u32 << ANGLE_FRACTION_BITS) as f64;

const OPCODE_SHIFT: u32 = 56;
const PARAM0_SHIFT: u32 = 40;
const PARAM1_SHIFT: u32 = 24;
const QUBIT0_SHIFT: u32 = 12;
const QUBIT1_SHIFT: u32 = 0;
const PARAM_MASK: u64 = 0xFFFF;
const QUBIT_MASK: u64 = 0x0FFF;

/// Quantize an angle in radians to its fixed-point wire representation.
///
/// Angles inside [−2π, 2π] are quantized directly, so the round trip through
/// [`fixed_to_angle`] stays within one quantization step on that interval.
/// Angles outside it are first reduced modulo 4π — the true period of SU(2)
/// rotations — into [−2π, 2π). The same real angle always yields the same
/// integer.
pub fn angle_to_fixed(theta: f64) -> u16 {
    const TWO_PI: f64 = std::f64::consts::TAU;
    const FOUR_PI: f64 = 2.0 * TWO_PI;

    let reduced = if (-TWO_PI..=TWO_PI).contains(&theta) {
        theta
    } else {
        let r = theta.rem_euclid(FOUR_PI);
        if r >= TWO_PI { r - FOUR_PI } else { r }
    };
    let quantized = (reduced * ANGLE_SCALE).round() as i16;
    quantized as u16
}

/// Recover the angle in radians from its fixed-point wire representation.
///
/// Exact inverse of [`angle_to_fixed`] up to the declared precision.
#[inline]
pub fn fixed_to_angle(param: u16) -> f64 {
    f64::from(param as i16) / ANGLE_SCALE
}

/// One decoded instruction: an opcode plus its arity-checked operands.
///
/// Values of this type can only be obtained through [`Instruction::new`] (or
/// the named constructors) and [`Instruction::decode`], both of which enforce
/// the opcode's declared arity, so an arity-illegal instruction is never
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    opcode: Opcode,
    params: [u16; 2],
    qubits: [u16; 2],
}

impl Instruction {
    /// Build an instruction, checking operand counts against the opcode's
    /// declared shape.
    pub fn new(opcode: Opcode, params: &[u16], qubits: &[u16]) -> IsaResult<Self> {
        if params.len() != opcode.num_params() {
            return Err(IsaError::ParamCountMismatch {
                opcode,
                expected: opcode.num_params(),
                got: params.len(),
            });
        }
        if qubits.len() != opcode.num_qubits() {
            return Err(IsaError::QubitCountMismatch {
                opcode,
                expected: opcode.num_qubits(),
                got: qubits.len(),
            });
        }
        for &q in qubits {
            if q > MAX_QUBIT_INDEX {
                return Err(IsaError::QubitIndexTooLarge(q));
            }
        }

        let mut p = [0u16; 2];
        p[..params.len()].copy_from_slice(params);
        let mut q = [0u16; 2];
        q[..qubits.len()].copy_from_slice(qubits);

        Ok(Self {
            opcode,
            params: p,
            qubits: q,
        })
    }

    /// `start_session` — no operands.
    pub fn start_session() -> Self {
        Self {
            opcode: Opcode::StartSession,
            params: [0; 2],
            qubits: [0; 2],
        }
    }

    /// `end_session` — no operands.
    pub fn end_session() -> Self {
        Self {
            opcode: Opcode::EndSession,
            params: [0; 2],
            qubits: [0; 2],
        }
    }

    /// `prepare_all` — no operands.
    pub fn prepare_all() -> Self {
        Self {
            opcode: Opcode::PrepareAll,
            params: [0; 2],
            qubits: [0; 2],
        }
    }

    /// `prepare` on one qubit.
    pub fn prepare(qubit: u16) -> IsaResult<Self> {
        Self::new(Opcode::Prepare, &[], &[qubit])
    }

    /// `measure` on one qubit with the two basis pre-rotation angles.
    pub fn measure(qubit: u16, alpha: u16, beta: u16) -> IsaResult<Self> {
        Self::new(Opcode::Measure, &[alpha, beta], &[qubit])
    }

    /// Load page-offset register 0.
    pub fn set_offset_0(value: u16) -> Self {
        Self {
            opcode: Opcode::SetOffset0,
            params: [value, 0],
            qubits: [0; 2],
        }
    }

    /// Load page-offset register 1.
    pub fn set_offset_1(value: u16) -> Self {
        Self {
            opcode: Opcode::SetOffset1,
            params: [value, 0],
            qubits: [0; 2],
        }
    }

    /// The opcode.
    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The parameters, truncated to the opcode's declared count.
    #[inline]
    pub fn params(&self) -> &[u16] {
        &self.params[..self.opcode.num_params()]
    }

    /// The qubit operands, truncated to the opcode's declared count.
    #[inline]
    pub fn qubits(&self) -> &[u16] {
        &self.qubits[..self.opcode.num_qubits()]
    }

    /// Pack into the 64-bit wire word.
    pub fn encode(&self) -> u64 {
        u64::from(self.opcode.to_wire()) << OPCODE_SHIFT
            | u64::from(self.params[0]) << PARAM0_SHIFT
            | u64::from(self.params[1]) << PARAM1_SHIFT
            | u64::from(self.qubits[0]) << QUBIT0_SHIFT
            | u64::from(self.qubits[1]) << QUBIT1_SHIFT
    }

    /// Unpack a wire word.
    ///
    /// Total over every word [`encode`](Self::encode) produces; any word whose
    /// opcode byte is outside the table is rejected. Operand fields beyond the
    /// opcode's arity are discarded so that `decode(encode(x)) == x`.
    pub fn decode(word: u64) -> IsaResult<Self> {
        let opcode = Opcode::from_wire((word >> OPCODE_SHIFT) as u8)?;

        let mut params = [0u16; 2];
        let mut qubits = [0u16; 2];
        let raw_params = [
            (word >> PARAM0_SHIFT & PARAM_MASK) as u16,
            (word >> PARAM1_SHIFT & PARAM_MASK) as u16,
        ];
        let raw_qubits = [
            (word >> QUBIT0_SHIFT & QUBIT_MASK) as u16,
            (word >> QUBIT1_SHIFT & QUBIT_MASK) as u16,
        ];
        params[..opcode.num_params()].copy_from_slice(&raw_params[..opcode.num_params()]);
        qubits[..opcode.num_qubits()].copy_from_slice(&raw_qubits[..opcode.num_qubits()]);

        Ok(Self {
            opcode,
            params,
            qubits,
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        for p in self.params() {
            write!(f, " #{}", *p as i16)?;
        }
        for q in self.qubits() {
            write!(f, " q{q}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_encode_decode_roundtrip() {
        let cases = [
            Instruction::start_session(),
            Instruction::prepare_all(),
            Instruction::new(Opcode::H, &[], &[3]).unwrap(),
            Instruction::new(Opcode::Rx, &[angle_to_fixed(FRAC_PI_2)], &[7]).unwrap(),
            Instruction::new(Opcode::Cnot, &[], &[0, 1]).unwrap(),
            Instruction::measure(5, angle_to_fixed(PI), angle_to_fixed(-PI)).unwrap(),
            Instruction::set_offset_0(4095),
            Instruction::set_offset_1(u16::MAX),
        ];
        for instr in cases {
            assert_eq!(Instruction::decode(instr.encode()).unwrap(), instr);
        }
    }

    #[test]
    fn test_arity_enforced_at_construction() {
        assert!(matches!(
            Instruction::new(Opcode::H, &[1], &[0]),
            Err(IsaError::ParamCountMismatch { .. })
        ));
        assert!(matches!(
            Instruction::new(Opcode::Rx, &[], &[0]),
            Err(IsaError::ParamCountMismatch { .. })
        ));
        assert!(matches!(
            Instruction::new(Opcode::Cnot, &[], &[0]),
            Err(IsaError::QubitCountMismatch { .. })
        ));
        assert!(matches!(
            Instruction::new(Opcode::StartSession, &[], &[0]),
            Err(IsaError::QubitCountMismatch { .. })
        ));
    }

    #[test]
    fn test_qubit_index_must_fit_field() {
        assert!(matches!(
            Instruction::new(Opcode::X, &[], &[0x1000]),
            Err(IsaError::QubitIndexTooLarge(0x1000))
        ));
        assert!(Instruction::new(Opcode::X, &[], &[MAX_QUBIT_INDEX]).is_ok());
    }

    #[test]
    fn test_decode_rejects_unknown_opcode() {
        let word = 0xFFu64 << 56;
        assert!(matches!(
            Instruction::decode(word),
            Err(IsaError::UnknownOpcode(0xFF))
        ));
    }

    #[test]
    fn test_decode_discards_fields_beyond_arity() {
        // An H word with junk in the parameter and second-qubit fields.
        let junk = u64::from(Opcode::H.to_wire()) << 56 | 0xABCD_u64 << 40 | 0x2 << 12 | 0x7;
        let instr = Instruction::decode(junk).unwrap();
        assert_eq!(instr.opcode(), Opcode::H);
        assert_eq!(instr.params(), &[]);
        assert_eq!(instr.qubits(), &[2]);
        // Re-encoding produces the canonical word with the junk cleared.
        assert_eq!(instr.encode(), Instruction::new(Opcode::H, &[], &[2]).unwrap().encode());
    }

    #[test]
    fn test_angle_quantization_stable() {
        assert_eq!(angle_to_fixed(0.0), 0);
        assert_eq!(angle_to_fixed(PI), angle_to_fixed(PI));
        // One radian is exactly the scale factor.
        assert_eq!(angle_to_fixed(1.0) as i16, 1i16 << ANGLE_FRACTION_BITS);
        // Negative angles use two's complement.
        assert_eq!(angle_to_fixed(-1.0) as i16, -(1i16 << ANGLE_FRACTION_BITS));
    }

    #[test]
    fn test_angle_roundtrip_within_one_step() {
        let step = 1.0 / ANGLE_SCALE;
        let mut theta = -TAU;
        while theta <= TAU {
            let back = fixed_to_angle(angle_to_fixed(theta));
            assert!(
                (back - theta).abs() <= step,
                "theta={theta} back={back}"
            );
            theta += 0.0137;
        }
        // Both endpoints exactly.
        for theta in [-TAU, TAU] {
            let back = fixed_to_angle(angle_to_fixed(theta));
            assert!((back - theta).abs() <= step);
        }
    }

    #[test]
    fn test_angle_reduction_outside_range() {
        // 5π reduces to π modulo 4π.
        assert_eq!(angle_to_fixed(5.0 * PI), angle_to_fixed(PI));
        // −5π reduces to −π.
        assert_eq!(angle_to_fixed(-5.0 * PI), angle_to_fixed(-PI));
    }

    #[test]
    fn test_display_listing() {
        let instr = Instruction::new(Opcode::Cnot, &[], &[0, 1]).unwrap();
        assert_eq!(instr.to_string(), "cnot q0 q1");
        let instr = Instruction::new(Opcode::Rx, &[angle_to_fixed(1.0)], &[3]).unwrap();
        assert_eq!(instr.to_string(), "rx #4096 q3");
    }
}
