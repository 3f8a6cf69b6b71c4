//! Error types for the ISA crate.

use crate::opcode::Opcode;
use thiserror::Error;

/// Errors that can occur while encoding or decoding ISA words.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IsaError {
    /// The opcode field of a word is not in the opcode table.
    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),

    /// Wrong number of parameters for the opcode.
    #[error("{opcode} takes {expected} parameter(s), got {got}")]
    ParamCountMismatch {
        /// The opcode being encoded.
        opcode: Opcode,
        /// Parameter count the opcode declares.
        expected: usize,
        /// Parameter count supplied by the caller.
        got: usize,
    },

    /// Wrong number of qubit operands for the opcode.
    #[error("{opcode} takes {expected} qubit operand(s), got {got}")]
    QubitCountMismatch {
        /// The opcode being encoded.
        opcode: Opcode,
        /// Qubit count the opcode declares.
        expected: usize,
        /// Qubit count supplied by the caller.
        got: usize,
    },

    /// A qubit operand does not fit the 12-bit in-word index field.
    #[error("qubit index {0} does not fit the 12-bit instruction field")]
    QubitIndexTooLarge(u16),

    /// A page-offset value does not fit the 40-bit result-word field.
    #[error("page offset {0} does not fit the 40-bit result field")]
    OffsetTooLarge(u64),

    /// A status value does not fit the 5-bit result-word field.
    #[error("measurement status {0} does not fit the 5-bit result field")]
    StatusTooLarge(u8),

    /// A word in a program stream failed to decode.
    #[error("word {index} is not a valid instruction: unknown opcode 0x{opcode:02x}")]
    InvalidWord {
        /// Position of the word in the stream.
        index: usize,
        /// The unrecognised opcode byte.
        opcode: u8,
    },

    /// A byte stream is not a whole number of 8-byte words.
    #[error("stream length {0} is not a multiple of the 8-byte word size")]
    TruncatedStream(usize),

    /// I/O failure while reading or writing a program.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for ISA operations.
pub type IsaResult<T> = Result<T, IsaError>;
