//! The program container: an ordered, append-only instruction sequence.
//!
//! A program serializes to a flat stream of 64-bit words — no header, no
//! length prefix — so files can be produced and consumed in a single pass.
//! Byte order on disk is little-endian.

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{IsaError, IsaResult};
use crate::word::{Instruction, WORD_BYTES};

/// An ordered sequence of instructions.
///
/// Order is execution order and is preserved exactly through every codec.
/// Equality is element-wise and order-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the program holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The instructions in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over the instructions in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Encode to a flat word sequence.
    pub fn to_words(&self) -> Vec<u64> {
        self.instructions.iter().map(Instruction::encode).collect()
    }

    /// Build a program from a flat word sequence.
    ///
    /// Fails on the first word the codec cannot decode; nothing is dropped
    /// silently.
    pub fn from_words(words: impl IntoIterator<Item = u64>) -> IsaResult<Self> {
        let mut instructions = Vec::new();
        for (index, word) in words.into_iter().enumerate() {
            let instruction = Instruction::decode(word).map_err(|e| match e {
                IsaError::UnknownOpcode(opcode) => IsaError::InvalidWord { index, opcode },
                other => other,
            })?;
            instructions.push(instruction);
        }
        Ok(Self { instructions })
    }

    /// Encode to the on-disk byte representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() * WORD_BYTES);
        for instruction in &self.instructions {
            bytes.extend_from_slice(&instruction.encode().to_le_bytes());
        }
        bytes
    }

    /// Decode from the on-disk byte representation.
    ///
    /// The stream must be a whole number of 8-byte words.
    pub fn from_bytes(bytes: &[u8]) -> IsaResult<Self> {
        if bytes.len() % WORD_BYTES != 0 {
            return Err(IsaError::TruncatedStream(bytes.len()));
        }
        Self::from_words(bytes.chunks_exact(WORD_BYTES).map(|chunk| {
            let mut word = [0u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            u64::from_le_bytes(word)
        }))
    }

    /// Stream the program to a writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> IsaResult<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read a whole program from a reader.
    pub fn read_from<R: Read>(reader: &mut R) -> IsaResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Write the program to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> IsaResult<()> {
        let mut file = std::fs::File::create(path)?;
        self.write_to(&mut file)
    }

    /// Load a program from a file.
    pub fn load(path: impl AsRef<Path>) -> IsaResult<Self> {
        let mut file = std::fs::File::open(path)?;
        Self::read_from(&mut file)
    }
}

impl fmt::Display for Program {
    /// Assembly-style listing, one instruction per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;
    use crate::word::angle_to_fixed;

    fn sample_program() -> Program {
        let mut program = Program::new();
        program.push(Instruction::start_session());
        program.push(Instruction::prepare_all());
        program.push(Instruction::new(Opcode::H, &[], &[0]).unwrap());
        program.push(Instruction::new(Opcode::Rz, &[angle_to_fixed(0.5)], &[1]).unwrap());
        program.push(Instruction::new(Opcode::Cnot, &[], &[0, 1]).unwrap());
        program.push(Instruction::measure(0, 0, 0).unwrap());
        program.push(Instruction::end_session());
        program
    }

    #[test]
    fn test_word_roundtrip() {
        let program = sample_program();
        let words = program.to_words();
        assert_eq!(words.len(), program.len());
        assert_eq!(Program::from_words(words).unwrap(), program);
    }

    #[test]
    fn test_byte_roundtrip() {
        let program = sample_program();
        let bytes = program.to_bytes();
        assert_eq!(bytes.len(), program.len() * WORD_BYTES);
        assert_eq!(Program::from_bytes(&bytes).unwrap(), program);
    }

    #[test]
    fn test_first_bad_word_rejected() {
        let mut words = sample_program().to_words();
        words[2] = 0xEEu64 << 56;
        assert!(matches!(
            Program::from_words(words),
            Err(IsaError::InvalidWord {
                index: 2,
                opcode: 0xEE
            })
        ));
    }

    #[test]
    fn test_truncated_stream_rejected() {
        let mut bytes = sample_program().to_bytes();
        bytes.pop();
        assert!(matches!(
            Program::from_bytes(&bytes),
            Err(IsaError::TruncatedStream(_))
        ));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = sample_program();
        let mut b = Program::new();
        for instruction in a.iter().rev() {
            b.push(*instruction);
        }
        assert_ne!(a, b);
    }

    #[test]
    fn test_file_roundtrip() {
        let program = sample_program();
        let path =
            std::env::temp_dir().join(format!("alsvid-program-{}.bin", std::process::id()));
        program.save(&path).unwrap();
        let back = Program::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn test_stream_roundtrip() {
        let program = sample_program();
        let mut buffer = Vec::new();
        program.write_to(&mut buffer).unwrap();
        let back = Program::read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn test_listing() {
        let listing = sample_program().to_string();
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines[0], "start_session");
        assert_eq!(lines[2], "h q0");
        assert_eq!(lines[4], "cnot q0 q1");
    }
}
