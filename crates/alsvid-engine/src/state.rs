//! The abstract quantum-state capability the interpreter runs against.

use rand::rngs::StdRng;

/// A gate operation with decoded angles.
///
/// This is the vocabulary the interpreter hands to a backend — one variant
/// per gate opcode of the ISA, with fixed-point parameters already converted
/// back to radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOp {
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// S gate.
    S,
    /// S-dagger.
    Sdg,
    /// T gate.
    T,
    /// T-dagger.
    Tdg,
    /// sqrt(X).
    SqrtX,
    /// Composite S·X.
    Sx,
    /// Composite S·Y.
    Sy,
    /// Rotation about X.
    Rx(f64),
    /// Rotation about Y.
    Ry(f64),
    /// Rotation about Z.
    Rz(f64),
    /// Phase gate diag(1, e^{iθ}).
    Phase(f64),
    /// Phased rotation Rz(φ)·Rx(θ)·Rz(−φ).
    Phased {
        /// Rotation angle θ.
        theta: f64,
        /// Axis phase φ.
        phi: f64,
    },
    /// Two-qubit XX rotation.
    Rxx(f64),
    /// Two-qubit ZZ rotation.
    Rzz(f64),
    /// Controlled-X; control first, target second.
    Cnot,
    /// SWAP.
    Swap,
}

impl GateOp {
    /// Number of qubits the operation spans.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            GateOp::Rxx(_) | GateOp::Rzz(_) | GateOp::Cnot | GateOp::Swap => 2,
            _ => 1,
        }
    }
}

/// What the interpreter needs from a quantum register.
///
/// Implementations hold the physical (or simulated) state of `num_qubits`
/// qubits. The interpreter owns all session and lifecycle bookkeeping; a
/// backend only ever sees valid indices and gates.
pub trait QuantumState {
    /// Register capacity in qubits.
    fn num_qubits(&self) -> usize;

    /// Apply a unitary gate to the given qubits (`gate.num_qubits()` of
    /// them, in operand order).
    fn apply_gate(&mut self, gate: &GateOp, qubits: &[usize]);

    /// Measure one qubit in the computational basis, collapsing the state.
    fn measure(&mut self, qubit: usize, rng: &mut StdRng) -> bool;

    /// Return one qubit to |0⟩.
    fn reset(&mut self, qubit: usize);
}

/// Backends the interpreter can allocate on demand.
pub trait StateBackend: QuantumState + Sized {
    /// Allocate a fresh register with every qubit in |0⟩.
    fn allocate(num_qubits: usize) -> Self;
}
