//! Property-based tests for the word codecs.
//!
//! The load-bearing contract of the ISA: decode(encode(x)) == x for every
//! arity-legal instruction, and the angle quantization round trip stays
//! within one step on [-2π, 2π].

use alsvid_isa::{
    ANGLE_FRACTION_BITS, Instruction, MAX_QUBIT_INDEX, MeasureResult, Opcode, Program,
    angle_to_fixed, fixed_to_angle,
};
use proptest::prelude::*;
use std::f64::consts::TAU;

/// Generate an arity-legal instruction for an arbitrary table opcode.
fn arb_instruction() -> impl Strategy<Value = Instruction> {
    (
        0..Opcode::ALL.len(),
        prop::array::uniform2(any::<u16>()),
        prop::array::uniform2(0..=MAX_QUBIT_INDEX),
    )
        .prop_map(|(idx, params, qubits)| {
            let opcode = Opcode::ALL[idx];
            Instruction::new(
                opcode,
                &params[..opcode.num_params()],
                &qubits[..opcode.num_qubits()],
            )
            .expect("arity-legal operands")
        })
}

proptest! {
    /// decode ∘ encode is the identity over every legal instruction.
    #[test]
    fn test_instruction_roundtrip(instr in arb_instruction()) {
        let decoded = Instruction::decode(instr.encode()).expect("word produced by encode");
        prop_assert_eq!(decoded, instr);
    }

    /// A whole program survives the word and byte codecs unchanged, in order.
    #[test]
    fn test_program_roundtrip(instrs in prop::collection::vec(arb_instruction(), 0..64)) {
        let program: Program = instrs.into_iter().collect();
        prop_assert_eq!(&Program::from_words(program.to_words()).unwrap(), &program);
        prop_assert_eq!(&Program::from_bytes(&program.to_bytes()).unwrap(), &program);
    }

    /// Quantization is deterministic and inverts within one step on [-2π, 2π].
    #[test]
    fn test_angle_roundtrip(theta in -TAU..=TAU) {
        let step = 1.0 / f64::from(1u32 << ANGLE_FRACTION_BITS);
        let fixed = angle_to_fixed(theta);
        prop_assert_eq!(fixed, angle_to_fixed(theta));
        let back = fixed_to_angle(fixed);
        prop_assert!((back - theta).abs() <= step);
    }

    /// Quantizing an angle twice is a fixed point: the decoded angle encodes
    /// back to the same integer.
    #[test]
    fn test_angle_requantization_stable(theta in -TAU..=TAU) {
        let fixed = angle_to_fixed(theta);
        prop_assert_eq!(angle_to_fixed(fixed_to_angle(fixed)), fixed);
    }

    /// The measurement-result codec round-trips every field.
    #[test]
    fn test_result_roundtrip(
        qubit in 0u16..=MAX_QUBIT_INDEX,
        offset in 0u64..1 << 40,
        status in 0u8..32,
        value in any::<bool>(),
    ) {
        let result = MeasureResult::with_status(qubit, offset, status, value).unwrap();
        prop_assert_eq!(MeasureResult::decode(result.encode()), result);
    }
}
