//! Error types for the execution engine.

use alsvid_isa::{IsaError, Opcode};
use thiserror::Error;

use crate::engine::QubitState;

/// Errors that can occur while executing instructions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// `start_session` while a session is open.
    #[error("session is already open; nested sessions are not supported")]
    SessionAlreadyOpen,

    /// Any non-session instruction without an open session.
    #[error("no open session: {opcode} requires start_session first")]
    NoSession {
        /// The instruction that was attempted.
        opcode: Opcode,
    },

    /// A register-touching instruction before `prepare_all`.
    #[error("no allocated register: {opcode} requires prepare_all first")]
    RegisterNotAllocated {
        /// The instruction that was attempted.
        opcode: Opcode,
    },

    /// A gate or measurement on a qubit that is not in the prepared state.
    #[error(
        "qubit {qubit} is {state}: {opcode} requires a prepared qubit \
         (re-prepare after measurement)"
    )]
    QubitNotPrepared {
        /// Logical index of the qubit.
        qubit: usize,
        /// Its current lifecycle state.
        state: QubitState,
        /// The instruction that was attempted.
        opcode: Opcode,
    },

    /// A (page-offset translated) qubit index beyond the register.
    #[error("logical qubit index {qubit} exceeds the register size {size}")]
    QubitOutOfRange {
        /// The offending logical index.
        qubit: usize,
        /// Register capacity.
        size: usize,
    },

    /// The configured register size cannot be served.
    #[error("register size must be between 1 and {max} qubits, got {requested}")]
    RegisterSize {
        /// Qubits requested by the configuration.
        requested: u32,
        /// Largest register the ISA can address.
        max: u32,
    },

    /// Word decoding failed.
    #[error(transparent)]
    Isa(#[from] IsaError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
