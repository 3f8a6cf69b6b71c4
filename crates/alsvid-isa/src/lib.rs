//! Alsvid HAL Instruction Set
//!
//! This crate defines the binary command-word format spoken between the
//! Alsvid compiler front-end and any execution backend — simulator or
//! hardware. It is the wire contract of the whole stack: every layout choice
//! here is versioned and bit-exact.
//!
//! # Overview
//!
//! - **Opcode table**: [`Opcode`], the closed enumeration of hardware
//!   operations with their static parameter/qubit shape
//! - **Instruction codec**: [`Instruction`], packing one operation into one
//!   64-bit word; [`angle_to_fixed`] / [`fixed_to_angle`] for the fixed-point
//!   angle representation
//! - **Result codec**: [`MeasureResult`], the distinct layout of the 64-bit
//!   measurement-result word
//! - **Program container**: [`Program`], an ordered instruction sequence with
//!   headerless binary (de)serialization
//!
//! # Wire format
//!
//! ```text
//! instruction:  opcode(8) | param0(16) | param1(16) | qubit0(12) | qubit1(12)
//! result:       qubit(12) | offset(40) | status(5)  | padding(6) | value(1)
//! ```
//!
//! Multi-word streams are little-endian, one instruction per word, no header,
//! no length prefix.
//!
//! # Example
//!
//! ```rust
//! use alsvid_isa::{angle_to_fixed, Instruction, Opcode, Program};
//!
//! let mut program = Program::new();
//! program.push(Instruction::start_session());
//! program.push(Instruction::prepare_all());
//! program.push(Instruction::new(Opcode::Rx, &[angle_to_fixed(1.0)], &[0]).unwrap());
//! program.push(Instruction::measure(0, 0, 0).unwrap());
//! program.push(Instruction::end_session());
//!
//! let bytes = program.to_bytes();
//! assert_eq!(Program::from_bytes(&bytes).unwrap(), program);
//! ```

pub mod error;
pub mod opcode;
pub mod program;
pub mod result;
pub mod word;

pub use error::{IsaError, IsaResult};
pub use opcode::Opcode;
pub use program::Program;
pub use result::{MeasureResult, STATUS_OK};
pub use word::{
    ANGLE_FRACTION_BITS, Instruction, MAX_QUBIT_INDEX, WORD_BYTES, angle_to_fixed, fixed_to_angle,
};
