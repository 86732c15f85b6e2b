use std::fmt;

use thiserror::Error;

use super::{Mnemonic, Operand};

/// A decoded operation: its mnemonic and the operands it is written with.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Operation {
    pub mnemonic: Mnemonic,
    pub operands: Vec<Operand>,
}

impl Operation {
    pub fn new(mnemonic: Mnemonic, operands: Vec<Operand>) -> Operation {
        Operation {
            mnemonic,
            operands,
        }
    }
}

/// An instruction word that matches no entry of the opcode table.
#[derive(Error, Debug, Eq, PartialEq, Clone, Copy)]
#[error("unknown opcode {word:#06x} in instruction class {class}")]
pub struct UnknownOpcode {
    pub word: u16,
    pub class: u8,
}

/// Result of decoding one 16-bit instruction word.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Instruction {
    Operation(Operation),
    Unknown(UnknownOpcode),
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, operands: Vec<Operand>) -> Instruction {
        Instruction::Operation(Operation::new(mnemonic, operands))
    }

    pub fn mnemonic(&self) -> Option<Mnemonic> {
        match self {
            Instruction::Operation(operation) => Some(operation.mnemonic),
            Instruction::Unknown(_) => None,
        }
    }

    pub fn operands(&self) -> &[Operand] {
        match self {
            Instruction::Operation(operation) => &operation.operands,
            Instruction::Unknown(_) => &[],
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Instruction::Unknown(_))
    }
}

/// `mnemonic<TAB>operand, operand, ...`; unknown words are written as `.word<TAB>0xNNNN`.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Operation(operation) => {
                write!(f, "{}\t", operation.mnemonic)?;
                for (ix, operand) in operation.operands.iter().enumerate() {
                    if ix != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", operand)?;
                }
                Ok(())
            }
            Instruction::Unknown(unknown) => write!(f, ".word\t0x{:04x}", unknown.word),
        }
    }
}
