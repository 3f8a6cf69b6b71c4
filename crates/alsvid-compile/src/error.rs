//! Error types for the compiler front-end.

use alsvid_isa::IsaError;
use thiserror::Error;

/// Errors that can occur while lowering a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The gate kind has no entry in the opcode lookup table.
    #[error("unsupported operation '{0}': no hardware opcode for this gate")]
    UnsupportedGate(String),

    /// The gate spans a number of qubits the ISA cannot express.
    #[error("gate '{gate}' spans {got} qubit(s); only 1- and 2-qubit operations can be lowered")]
    OperandCount {
        /// Name of the offending gate.
        gate: String,
        /// Number of qubit operands it carries.
        got: usize,
    },

    /// The gate carries a classical condition.
    #[error("gate '{gate}' carries a classical condition; conditional execution is not supported")]
    ClassicalControl {
        /// Name of the offending gate.
        gate: String,
    },

    /// The circuit needs more qubits than the ISA can address.
    #[error("circuit uses {required} qubits but the ISA addresses at most {available}")]
    RegisterTooLarge {
        /// Qubits the circuit declares.
        required: usize,
        /// Qubits the instruction word can address.
        available: usize,
    },

    /// Word construction failed.
    #[error(transparent)]
    Encode(#[from] IsaError),
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
