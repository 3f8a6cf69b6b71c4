//! The session/lifecycle state machine driving a quantum-state backend.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, trace};

use alsvid_isa::{
    Instruction, MAX_QUBIT_INDEX, MeasureResult, Opcode, Program, fixed_to_angle,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::state::{GateOp, StateBackend};
use crate::statevector::Statevector;

/// Largest register an engine can serve: the 12-bit qubit field of the
/// measurement-result word caps the reportable logical index.
pub const MAX_REGISTER_QUBITS: u32 = MAX_QUBIT_INDEX as u32 + 1;

/// Lifecycle state of one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QubitState {
    /// No register holds this qubit (or it was discarded).
    Unprepared,
    /// In |0⟩ or gate-evolved; gates and measurement are legal.
    Prepared,
    /// Collapsed by measurement; must be re-prepared before reuse.
    Measured,
}

impl fmt::Display for QubitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitState::Unprepared => write!(f, "unprepared"),
            QubitState::Prepared => write!(f, "prepared"),
            QubitState::Measured => write!(f, "measured"),
        }
    }
}

/// The reference interpreter.
///
/// Consumes one 64-bit instruction word at a time and applies it to a backing
/// quantum state, enforcing the session state machine:
///
/// ```text
///   Idle ──start_session──▶ Open/Unallocated ──prepare_all──▶ Allocated
///    ▲                                ▲                           │
///    │                                └──────last measure─────────┤
///    └───────────────end_session (always succeeds)────────────────┘
/// ```
///
/// Per qubit, while allocated: Prepared ──measure──▶ Measured ──prepare──▶
/// Prepared. Gates demand every operand in Prepared.
///
/// All state — session flag, register, page-offset registers, lifecycle
/// flags, RNG — is exclusively owned by this instance; dropping the engine
/// releases the register with no finalizer involved. Execution is strictly
/// synchronous and in program order.
pub struct Engine<B: StateBackend = Statevector> {
    config: EngineConfig,
    session_open: bool,
    register: Option<B>,
    lifecycle: Vec<QubitState>,
    offsets: [u16; 2],
    rng: StdRng,
}

impl<B: StateBackend> Engine<B> {
    /// Build an engine over backend `B` from a configuration.
    ///
    /// The configuration is the serializable half of the pair; the live
    /// engine never serializes.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        if config.num_qubits == 0 || config.num_qubits > MAX_REGISTER_QUBITS {
            return Err(EngineError::RegisterSize {
                requested: config.num_qubits,
                max: MAX_REGISTER_QUBITS,
            });
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let lifecycle = vec![QubitState::Unprepared; config.num_qubits as usize];
        Ok(Self {
            config,
            session_open: false,
            register: None,
            lifecycle,
            offsets: [0, 0],
            rng,
        })
    }

    /// The configuration this engine was built from.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check if a session is open.
    pub fn session_open(&self) -> bool {
        self.session_open
    }

    /// Check if the register is allocated.
    pub fn register_allocated(&self) -> bool {
        self.register.is_some()
    }

    /// Current value of a page-offset register (slot 0 or 1).
    pub fn page_offset(&self, slot: usize) -> u16 {
        self.offsets[slot]
    }

    /// Lifecycle state of a qubit, if the index is in range.
    pub fn qubit_state(&self, qubit: usize) -> Option<QubitState> {
        self.lifecycle.get(qubit).copied()
    }

    /// Apply one instruction word.
    ///
    /// Returns a measurement-result word for `measure`, nothing for every
    /// other opcode. Any error leaves the instruction unapplied; only
    /// `end_session` recovers dirty state, by discarding it.
    pub fn apply(&mut self, word: u64) -> EngineResult<Option<u64>> {
        let instr = Instruction::decode(word)?;
        trace!(%instr, "apply");
        match instr.opcode() {
            Opcode::StartSession => {
                if self.session_open {
                    return Err(EngineError::SessionAlreadyOpen);
                }
                self.session_open = true;
                self.offsets = [0, 0];
                Ok(None)
            }
            Opcode::EndSession => {
                // Always succeeds: unmeasured qubits are discarded with the
                // register, on this and every other exit path.
                self.release_register();
                self.session_open = false;
                Ok(None)
            }
            opcode if !self.session_open => Err(EngineError::NoSession { opcode }),
            Opcode::PrepareAll => {
                let n = self.config.num_qubits as usize;
                self.register = Some(B::allocate(n));
                self.lifecycle.fill(QubitState::Prepared);
                Ok(None)
            }
            Opcode::Prepare => self.prepare_one(&instr),
            Opcode::Measure => self.measure_one(&instr).map(Some),
            Opcode::SetOffset0 => {
                self.offsets[0] = instr.params()[0];
                Ok(None)
            }
            Opcode::SetOffset1 => {
                self.offsets[1] = instr.params()[0];
                Ok(None)
            }
            // Identity is a classical no-op: no lifecycle demands, no state
            // change.
            Opcode::Id => Ok(None),

            Opcode::X => self.run_gate(GateOp::X, &instr),
            Opcode::Y => self.run_gate(GateOp::Y, &instr),
            Opcode::Z => self.run_gate(GateOp::Z, &instr),
            Opcode::H => self.run_gate(GateOp::H, &instr),
            Opcode::S => self.run_gate(GateOp::S, &instr),
            Opcode::Sdg => self.run_gate(GateOp::Sdg, &instr),
            Opcode::T => self.run_gate(GateOp::T, &instr),
            Opcode::Tdg => self.run_gate(GateOp::Tdg, &instr),
            Opcode::SqrtX => self.run_gate(GateOp::SqrtX, &instr),
            Opcode::Sx => self.run_gate(GateOp::Sx, &instr),
            Opcode::Sy => self.run_gate(GateOp::Sy, &instr),
            Opcode::Rx => self.run_gate(GateOp::Rx(fixed_to_angle(instr.params()[0])), &instr),
            Opcode::Ry => self.run_gate(GateOp::Ry(fixed_to_angle(instr.params()[0])), &instr),
            Opcode::Rz => self.run_gate(GateOp::Rz(fixed_to_angle(instr.params()[0])), &instr),
            Opcode::P => self.run_gate(GateOp::Phase(fixed_to_angle(instr.params()[0])), &instr),
            Opcode::R => self.run_gate(
                GateOp::Phased {
                    theta: fixed_to_angle(instr.params()[0]),
                    phi: fixed_to_angle(instr.params()[1]),
                },
                &instr,
            ),
            Opcode::Rxx => self.run_gate(GateOp::Rxx(fixed_to_angle(instr.params()[0])), &instr),
            Opcode::Rzz => self.run_gate(GateOp::Rzz(fixed_to_angle(instr.params()[0])), &instr),
            Opcode::Cnot => self.run_gate(GateOp::Cnot, &instr),
            Opcode::Swap => self.run_gate(GateOp::Swap, &instr),
        }
        .map(|result| {
            if result.is_some() {
                debug!(%instr, "measurement result emitted");
            }
            result
        })
    }

    /// Run a whole program in order, collecting the result words.
    #[instrument(skip(self, program), fields(instructions = program.len()))]
    pub fn run(&mut self, program: &Program) -> EngineResult<Vec<u64>> {
        let mut results = Vec::new();
        for instruction in program {
            if let Some(word) = self.apply(instruction.encode())? {
                results.push(word);
            }
        }
        Ok(results)
    }

    /// Run a program `shots` times, histogramming the measured bitstrings.
    ///
    /// One program run is one shot; the program is expected to bracket its
    /// own session the way compiled programs do. Bitstring characters are
    /// ordered by ascending logical qubit index.
    #[instrument(skip(self, program))]
    pub fn sample(&mut self, program: &Program, shots: u32) -> EngineResult<FxHashMap<String, u64>> {
        let mut counts: FxHashMap<String, u64> = FxHashMap::default();
        for _ in 0..shots {
            let mut outcomes: Vec<(u16, bool)> = self
                .run(program)?
                .into_iter()
                .map(|word| {
                    let result = MeasureResult::decode(word);
                    (result.qubit, result.value)
                })
                .collect();
            outcomes.sort_by_key(|(qubit, _)| *qubit);
            let bitstring: String = outcomes
                .iter()
                .map(|(_, value)| if *value { '1' } else { '0' })
                .collect();
            *counts.entry(bitstring).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Translate an in-word qubit slot through its page-offset register.
    fn logical(&self, slot: usize, raw: u16) -> EngineResult<usize> {
        let index = usize::from(self.offsets[slot]) + usize::from(raw);
        let size = self.config.num_qubits as usize;
        if index >= size {
            return Err(EngineError::QubitOutOfRange {
                qubit: index,
                size,
            });
        }
        Ok(index)
    }

    fn prepare_one(&mut self, instr: &Instruction) -> EngineResult<Option<u64>> {
        let qubit = self.logical(0, instr.qubits()[0])?;
        let Some(register) = self.register.as_mut() else {
            return Err(EngineError::RegisterNotAllocated {
                opcode: Opcode::Prepare,
            });
        };
        register.reset(qubit);
        self.lifecycle[qubit] = QubitState::Prepared;
        Ok(None)
    }

    fn measure_one(&mut self, instr: &Instruction) -> EngineResult<u64> {
        let qubit = self.logical(0, instr.qubits()[0])?;
        match self.lifecycle[qubit] {
            QubitState::Prepared => {}
            state => {
                return Err(EngineError::QubitNotPrepared {
                    qubit,
                    state,
                    opcode: Opcode::Measure,
                });
            }
        }
        let Some(register) = self.register.as_mut() else {
            return Err(EngineError::RegisterNotAllocated {
                opcode: Opcode::Measure,
            });
        };

        // Basis pre-rotation: Rz by the first angle, Ry by the second, so a
        // caller can measure along an arbitrary axis.
        let alpha = fixed_to_angle(instr.params()[0]);
        let beta = fixed_to_angle(instr.params()[1]);
        if alpha != 0.0 {
            register.apply_gate(&GateOp::Rz(alpha), &[qubit]);
        }
        if beta != 0.0 {
            register.apply_gate(&GateOp::Ry(beta), &[qubit]);
        }

        let value = register.measure(qubit, &mut self.rng);
        self.lifecycle[qubit] = QubitState::Measured;

        let result = MeasureResult::new(qubit as u16, u64::from(self.offsets[0]), value)?;

        // The last unmeasured qubit releases the register so a fresh
        // prepare_all can start the next shot within the same session.
        if self.lifecycle.iter().all(|s| *s == QubitState::Measured) {
            debug!("all qubits measured; releasing register");
            self.release_register();
        }

        Ok(result.encode())
    }

    fn run_gate(&mut self, gate: GateOp, instr: &Instruction) -> EngineResult<Option<u64>> {
        let n = gate.num_qubits();
        let mut qubits = [0usize; 2];
        for (slot, q) in qubits.iter_mut().enumerate().take(n) {
            *q = self.logical(slot, instr.qubits()[slot])?;
        }
        for &qubit in &qubits[..n] {
            match self.lifecycle[qubit] {
                QubitState::Prepared => {}
                state => {
                    return Err(EngineError::QubitNotPrepared {
                        qubit,
                        state,
                        opcode: instr.opcode(),
                    });
                }
            }
        }
        let Some(register) = self.register.as_mut() else {
            return Err(EngineError::RegisterNotAllocated {
                opcode: instr.opcode(),
            });
        };
        register.apply_gate(&gate, &qubits[..n]);
        Ok(None)
    }

    fn release_register(&mut self) {
        self.register = None;
        self.lifecycle.fill(QubitState::Unprepared);
    }
}

impl Engine<Statevector> {
    /// Build an engine with the backend named by the configuration.
    pub fn from_config(config: EngineConfig) -> EngineResult<Self> {
        match config.backend {
            crate::config::BackendKind::Statevector => Self::new(config),
        }
    }
}
