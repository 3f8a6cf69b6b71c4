//! Lowering from circuit IR to instruction words.

use tracing::{debug, instrument, trace};

use alsvid_ir::{Circuit, Gate, GateKind, InstructionKind, StandardGate};
use alsvid_isa::{Instruction, MAX_QUBIT_INDEX, Opcode, Program, angle_to_fixed};

use crate::error::{CompileError, CompileResult};

/// Lower a circuit into an executable program.
///
/// The emitted program brackets the source operations with the session
/// lifecycle: `start_session`, `prepare_all`, one instruction per source
/// entry in order, `end_session`. Barriers only constrain ordering, which the
/// linear IR already fixes, so they emit nothing.
///
/// Fails — naming the offending gate — on any operation the opcode table
/// cannot express: unknown gate kinds, operand counts other than 1 or 2, and
/// classical conditions.
#[instrument(skip(circuit), fields(circuit = circuit.name()))]
pub fn lower(circuit: &Circuit) -> CompileResult<Program> {
    let available = usize::from(MAX_QUBIT_INDEX) + 1;
    if circuit.num_qubits() > available {
        return Err(CompileError::RegisterTooLarge {
            required: circuit.num_qubits(),
            available,
        });
    }

    let mut program = Program::new();
    program.push(Instruction::start_session());
    program.push(Instruction::prepare_all());

    for instruction in circuit.iter() {
        match &instruction.kind {
            InstructionKind::Barrier => {
                trace!("consuming barrier over {} qubit(s)", instruction.qubits.len());
            }
            InstructionKind::Measure => {
                let qubit = instruction.qubits[0].0 as u16;
                program.push(Instruction::measure(qubit, 0, 0)?);
            }
            InstructionKind::Gate(gate) => {
                program.push(lower_gate(gate, &instruction.qubits)?);
            }
        }
    }

    program.push(Instruction::end_session());

    debug!(
        instructions = program.len(),
        qubits = circuit.num_qubits(),
        "lowered circuit"
    );
    Ok(program)
}

/// Lower a single gate entry to one instruction word.
fn lower_gate(gate: &Gate, qubits: &[alsvid_ir::QubitId]) -> CompileResult<Instruction> {
    if gate.condition.is_some() {
        return Err(CompileError::ClassicalControl {
            gate: gate.name().to_string(),
        });
    }
    if qubits.is_empty() || qubits.len() > 2 {
        return Err(CompileError::OperandCount {
            gate: gate.name().to_string(),
            got: qubits.len(),
        });
    }

    let standard = match &gate.kind {
        GateKind::Standard(standard) => standard,
        GateKind::Custom(custom) => {
            return Err(CompileError::UnsupportedGate(custom.name.clone()));
        }
    };

    let opcode = opcode_for(standard)?;
    let operands: Vec<u16> = qubits.iter().map(|q| q.0 as u16).collect();
    let instruction = match standard.param() {
        Some(theta) => Instruction::new(opcode, &[angle_to_fixed(theta)], &operands)?,
        None => Instruction::new(opcode, &[], &operands)?,
    };
    Ok(instruction)
}

/// The closed gate-kind → opcode lookup table.
///
/// Exhaustive over [`StandardGate`]: adding an IR gate without deciding its
/// lowering fails the build here instead of falling through at run time.
fn opcode_for(gate: &StandardGate) -> CompileResult<Opcode> {
    match gate {
        StandardGate::I => Ok(Opcode::Id),
        StandardGate::X => Ok(Opcode::X),
        StandardGate::Y => Ok(Opcode::Y),
        StandardGate::Z => Ok(Opcode::Z),
        StandardGate::H => Ok(Opcode::H),
        StandardGate::S => Ok(Opcode::S),
        StandardGate::Sdg => Ok(Opcode::Sdg),
        StandardGate::T => Ok(Opcode::T),
        StandardGate::Tdg => Ok(Opcode::Tdg),
        StandardGate::SX => Ok(Opcode::SqrtX),
        StandardGate::Rx(_) => Ok(Opcode::Rx),
        StandardGate::Ry(_) => Ok(Opcode::Ry),
        StandardGate::Rz(_) => Ok(Opcode::Rz),
        StandardGate::P(_) => Ok(Opcode::P),
        StandardGate::CX => Ok(Opcode::Cnot),
        StandardGate::Swap => Ok(Opcode::Swap),
        StandardGate::RXX(_) => Ok(Opcode::Rxx),
        StandardGate::RZZ(_) => Ok(Opcode::Rzz),

        gate @ (StandardGate::SXdg
        | StandardGate::CY
        | StandardGate::CZ
        | StandardGate::CH
        | StandardGate::ISwap
        | StandardGate::RYY(_)) => Err(CompileError::UnsupportedGate(gate.name().to_string())),
    }
}
