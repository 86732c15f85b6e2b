pub mod instruction;
pub mod mnemonic;
pub mod operand;

pub use instruction::{Instruction, Operation, UnknownOpcode};
pub use mnemonic::Mnemonic;
pub use operand::{Offset, Operand, Register, StatusRegister};
