use crate::{
    bits::BitRange,
    isa::{Instruction, Offset, Operand, Register, UnknownOpcode},
};

use self::opcode::{
    OperandTemplate, CLASS, IMM3, IMM4, IMM6, IMM8, OFFSET10, OPCODE_TABLE, RD, RM, RN,
};

/// Turns records into listing lines.
pub mod listing;

/// Mapping from instruction words to mnemonics and operand layouts.
pub mod opcode;

/// Drives a whole input through the record decoder and the listing.
pub mod runner;

pub use listing::{disassemble, Disassembly, DisassemblyLine, Driver, DriverError, DriverState};
pub use runner::{disassemble_file, disassemble_stream, DisassemblyArgs, Options, RunError, Summary};

/// Branch targets wrap within this window.
pub const BRANCH_WINDOW: u16 = 0x3FF;

fn field(range: BitRange, word: u16) -> u16 {
    range.get(u32::from(word)) as u16
}

fn register(range: BitRange, word: u16) -> Register {
    Register::General(field(range, word) as u8)
}

/// Decode a single instruction word.
///
/// `next_pc` is the address of the following instruction, which is what branch offsets are
/// relative to. Words outside the opcode map decode to [`Instruction::Unknown`].
#[tracing::instrument]
pub fn decode_instruction(word: u16, next_pc: u16) -> Instruction {
    match OPCODE_TABLE.find(word) {
        Some(entry) => Instruction::new(entry.mnemonic, operands(entry.template, word, next_pc)),
        None => Instruction::Unknown(UnknownOpcode {
            word,
            class: field(CLASS, word) as u8,
        }),
    }
}

fn operands(template: OperandTemplate, word: u16, next_pc: u16) -> Vec<Operand> {
    let rd = Operand::Register(register(RD, word));
    let rn = Operand::Register(register(RN, word));
    let rm = Operand::Register(register(RM, word));

    match template {
        OperandTemplate::IndexedImmediate => vec![
            rd,
            Operand::Memory {
                base: register(RN, word),
                offset: Offset::Immediate(field(IMM3, word)),
            },
        ],
        OperandTemplate::IndexedRegister => vec![
            rd,
            Operand::Memory {
                base: register(RN, word),
                offset: Offset::Register(register(RM, word)),
            },
        ],
        OperandTemplate::PcRelative => vec![
            rd,
            Operand::Memory {
                base: Register::Pc,
                offset: Offset::Immediate(field(IMM6, word)),
            },
        ],
        OperandTemplate::Single => vec![rd],
        OperandTemplate::Branch => {
            let target = next_pc.wrapping_add(field(OFFSET10, word) << 1) & BRANCH_WINDOW;
            vec![Operand::Address(target)]
        }
        OperandTemplate::MoveImmediate => vec![rd, Operand::Immediate(field(IMM8, word))],
        OperandTemplate::ThreeRegister => vec![rd, rn, rm],
        OperandTemplate::RegisterImmediate => vec![rd, rn, Operand::Immediate(field(IMM4, word))],
        OperandTemplate::TwoRegister => vec![rd, rn],
        OperandTemplate::MoveHigh => vec![
            Operand::Register(Register::aliased_destination(field(RD, word) as u8)),
            Operand::Register(Register::aliased_source(field(RM, word) as u8)),
        ],
        OperandTemplate::MoveRegister => vec![rd, rm],
        OperandTemplate::ReturnFromException => vec![
            Operand::Register(Register::Pc),
            Operand::Register(Register::Lr),
        ],
        OperandTemplate::WriteStatus(status) => vec![Operand::Status(status), rm],
        OperandTemplate::ReadStatus(status) => vec![rd, Operand::Status(status)],
        OperandTemplate::Compare => vec![rn, rm],
    }
}
