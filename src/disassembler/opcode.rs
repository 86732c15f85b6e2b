use lazy_static::lazy_static;

use crate::{
    bits::BitRange,
    isa::{Mnemonic, StatusRegister},
};

/// Instruction class, the three most significant bits.
pub const CLASS: BitRange = BitRange::fixed(15, 13);
/// Sub-opcode of the load, store and branch classes.
pub const SELECT3: BitRange = BitRange::fixed(12, 10);
/// Sub-opcode of the arithmetic, logic and shift classes.
pub const SELECT2: BitRange = BitRange::fixed(12, 11);
/// `mov`/`movt` selector.
pub const SELECT1: BitRange = BitRange::fixed(12, 12);
/// Operation of the register move group in class 5, shares its bits with `rn`.
pub const MOVE_OP: BitRange = BitRange::fixed(6, 4);

pub const RD: BitRange = BitRange::fixed(3, 0);
pub const RN: BitRange = BitRange::fixed(6, 4);
pub const RM: BitRange = BitRange::fixed(10, 7);
pub const IMM3: BitRange = BitRange::fixed(9, 7);
pub const IMM4: BitRange = BitRange::fixed(10, 7);
pub const IMM6: BitRange = BitRange::fixed(9, 4);
pub const IMM8: BitRange = BitRange::fixed(11, 4);
pub const OFFSET10: BitRange = BitRange::fixed(9, 0);

/// How the operands of an instruction are laid out in the word and written.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum OperandTemplate {
    /// `rd, [rn, imm3]`
    IndexedImmediate,
    /// `rd, [rn, rm]`
    IndexedRegister,
    /// `rd, [pc, imm6]`
    PcRelative,
    /// `rd`
    Single,
    /// `0xNNNN`, `(next_pc + 2 * offset10) & 0x3ff`
    Branch,
    /// `rd, imm8`
    MoveImmediate,
    /// `rd, rn, rm`
    ThreeRegister,
    /// `rd, rn, imm4`
    RegisterImmediate,
    /// `rd, rn`
    TwoRegister,
    /// `rd, rm` with `r15` written `pc` as `rd` and `r14` written `lr` as `rm`
    MoveHigh,
    /// `rd, rm`
    MoveRegister,
    /// `pc, lr`
    ReturnFromException,
    /// `psr, rm`
    WriteStatus(StatusRegister),
    /// `rd, psr`
    ReadStatus(StatusRegister),
    /// `rn, rm`
    Compare,
}

/// An instruction word matches the entry when `word & mask == value`.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct OpcodeEntry {
    pub mask: u16,
    pub value: u16,
    pub mnemonic: Mnemonic,
    pub template: OperandTemplate,
}

impl OpcodeEntry {
    /// Entry matching every word whose `fields` hold the given values.
    fn new(fields: &[(BitRange, u32)], mnemonic: Mnemonic, template: OperandTemplate) -> Self {
        let (mask, value) = fields.iter().fold((0u32, 0u32), |(mask, value), &(range, field)| {
            (mask | range.mask(), value | ((field << range.lsp()) & range.mask()))
        });
        OpcodeEntry {
            mask: mask as u16,
            value: value as u16,
            mnemonic,
            template,
        }
    }

    pub fn matches(&self, word: u16) -> bool {
        word & self.mask == self.value
    }
}

/// The P16 opcode map, searched in order.
#[derive(Debug)]
pub struct OpcodeTable {
    entries: Vec<OpcodeEntry>,
}

impl OpcodeTable {
    /// First entry matching the word, `None` for the gaps in the opcode map.
    #[tracing::instrument]
    pub fn find(&self, word: u16) -> Option<&OpcodeEntry> {
        self.entries.iter().find(|entry| entry.matches(word))
    }

    pub fn entries(&self) -> &[OpcodeEntry] {
        &self.entries
    }

    #[tracing::instrument]
    fn new() -> Self {
        use Mnemonic::*;
        use OperandTemplate::*;

        let mappings = vec![
            // Class 0: loads
            (0, SELECT3, 0, Ldr, IndexedImmediate),
            (0, SELECT3, 1, Pop, Single),
            (0, SELECT3, 2, Ldrb, IndexedImmediate),
            (0, SELECT3, 3, Ldr, PcRelative),
            (0, SELECT2, 2, Ldr, IndexedRegister),
            (0, SELECT2, 3, Ldrb, IndexedRegister),
            // Class 1: stores, sub-opcode 3 is unassigned
            (1, SELECT3, 0, Str, IndexedImmediate),
            (1, SELECT3, 1, Push, Single),
            (1, SELECT3, 2, Strb, IndexedImmediate),
            (1, SELECT2, 2, Str, IndexedRegister),
            (1, SELECT2, 3, Strb, IndexedRegister),
            // Class 2: branches
            (2, SELECT3, 0, Bzs, Branch),
            (2, SELECT3, 1, Bzc, Branch),
            (2, SELECT3, 2, Bcs, Branch),
            (2, SELECT3, 3, Bcc, Branch),
            (2, SELECT3, 4, Bge, Branch),
            (2, SELECT3, 5, Blt, Branch),
            (2, SELECT3, 6, B, Branch),
            (2, SELECT3, 7, Bl, Branch),
            // Class 3: move immediate
            (3, SELECT1, 0, Mov, MoveImmediate),
            (3, SELECT1, 1, Movt, MoveImmediate),
            // Class 4: arithmetic on registers
            (4, SELECT2, 0, Add, ThreeRegister),
            (4, SELECT2, 1, Sub, ThreeRegister),
            (4, SELECT2, 2, Adc, ThreeRegister),
            (4, SELECT2, 3, Sbc, ThreeRegister),
            // Class 5: arithmetic with immediates and compare, sub-opcode 2 is expanded below
            (5, SELECT2, 0, Add, RegisterImmediate),
            (5, SELECT2, 1, Sub, RegisterImmediate),
            (5, SELECT2, 3, Cmp, Compare),
            // Class 6: logic
            (6, SELECT2, 0, And, ThreeRegister),
            (6, SELECT2, 1, Orr, ThreeRegister),
            (6, SELECT2, 2, Eor, ThreeRegister),
            (6, SELECT2, 3, Rrx, TwoRegister),
            // Class 7: shifts
            (7, SELECT2, 0, Lsl, RegisterImmediate),
            (7, SELECT2, 1, Lsr, RegisterImmediate),
            (7, SELECT2, 2, Asr, RegisterImmediate),
            (7, SELECT2, 3, Ror, RegisterImmediate),
        ];

        // Class 5, sub-opcode 2: register and status moves, operation 3 is unassigned
        let moves = vec![
            (0, Mov, MoveHigh),
            (1, Mvn, MoveRegister),
            (2, Movs, ReturnFromException),
            (4, Msr, WriteStatus(StatusRegister::Cpsr)),
            (5, Msr, WriteStatus(StatusRegister::Spsr)),
            (6, Mrs, ReadStatus(StatusRegister::Cpsr)),
            (7, Mrs, ReadStatus(StatusRegister::Spsr)),
        ];

        let mut entries: Vec<OpcodeEntry> = mappings
            .into_iter()
            .map(|(class, select, sub, mnemonic, template)| {
                OpcodeEntry::new(&[(CLASS, class), (select, sub)], mnemonic, template)
            })
            .collect();
        entries.extend(moves.into_iter().map(|(operation, mnemonic, template)| {
            OpcodeEntry::new(
                &[(CLASS, 5), (SELECT2, 2), (MOVE_OP, operation)],
                mnemonic,
                template,
            )
        }));

        OpcodeTable { entries }
    }
}

lazy_static! {
    pub static ref OPCODE_TABLE: OpcodeTable = OpcodeTable::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn find(word: u16) -> Option<(Mnemonic, OperandTemplate)> {
        OPCODE_TABLE
            .find(word)
            .map(|entry| (entry.mnemonic, entry.template))
    }

    #[test]
    fn test_entry_mask() {
        let entry = OpcodeEntry::new(
            &[(CLASS, 5), (SELECT2, 2), (MOVE_OP, 4)],
            Mnemonic::Msr,
            OperandTemplate::WriteStatus(StatusRegister::Cpsr),
        );
        assert_eq!(entry.mask, 0xE000 | 0x1800 | 0x0070);
        assert_eq!(entry.value, 0xA000 | 0x1000 | 0x0040);
        assert!(entry.matches(0xB040));
        assert!(entry.matches(0xB7CF));
        assert!(!entry.matches(0xB050));
    }

    #[test]
    fn test_find() {
        use Mnemonic::*;
        use OperandTemplate::*;

        let tests = vec![
            (0x0000, Some((Ldr, IndexedImmediate))),
            (0x0400, Some((Pop, Single))),
            (0x0800, Some((Ldrb, IndexedImmediate))),
            (0x0C00, Some((Ldr, PcRelative))),
            (0x1000, Some((Ldr, IndexedRegister))),
            (0x1400, Some((Ldr, IndexedRegister))),
            (0x1800, Some((Ldrb, IndexedRegister))),
            (0x1C00, Some((Ldrb, IndexedRegister))),
            (0x2000, Some((Str, IndexedImmediate))),
            (0x2400, Some((Push, Single))),
            (0x2C00, None),
            (0x3400, Some((Str, IndexedRegister))),
            (0x3C00, Some((Strb, IndexedRegister))),
            (0x5800, Some((B, Branch))),
            (0x5C00, Some((Bl, Branch))),
            (0x6000, Some((Mov, MoveImmediate))),
            (0x7000, Some((Movt, MoveImmediate))),
            (0x9800, Some((Sbc, ThreeRegister))),
            (0xA000, Some((Add, RegisterImmediate))),
            (0xB000, Some((Mov, MoveHigh))),
            (0xB020, Some((Movs, ReturnFromException))),
            (0xB030, None),
            (0xB070, Some((Mrs, ReadStatus(StatusRegister::Spsr)))),
            (0xB800, Some((Cmp, Compare))),
            (0xD800, Some((Rrx, TwoRegister))),
            (0xF800, Some((Ror, RegisterImmediate))),
        ];
        for (word, expected) in tests {
            assert_eq!(find(word), expected, "{word:#06x}");
        }
    }

    #[test]
    fn test_entries_do_not_overlap() {
        let entries = OPCODE_TABLE.entries();
        for word in 0..=u16::MAX {
            let matching = entries.iter().filter(|entry| entry.matches(word)).count();
            assert!(matching <= 1, "{word:#06x} matches {matching} entries");
        }
    }

    #[test]
    fn test_only_two_gaps() {
        // Store sub-opcode 3 and move operation 3, each with every operand bit pattern
        let unmapped = (0..=u16::MAX)
            .filter(|word| OPCODE_TABLE.find(*word).is_none())
            .count();
        assert_eq!(unmapped, 1024 + 256);
    }
}
