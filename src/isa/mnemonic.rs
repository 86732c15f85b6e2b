/// Mnemonic of a P16 instruction.
///
/// This represents the operation that is performed by the instruction. The textual form is the
/// lowercase variant name, e.g. `Ldrb` is written `ldrb`.
#[derive(
    Debug,
    Hash,
    Eq,
    PartialEq,
    Clone,
    Copy,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    // Memory access
    Ldr,
    Ldrb,
    Str,
    Strb,
    Push,
    Pop,
    // Branches
    Bzs,
    Bzc,
    Bcs,
    Bcc,
    Bge,
    Blt,
    B,
    Bl,
    // Moves
    Mov,
    Movt,
    Movs,
    Mvn,
    Msr,
    Mrs,
    // Arithmetic
    Add,
    Sub,
    Adc,
    Sbc,
    Cmp,
    // Logic
    And,
    Orr,
    Eor,
    // Shifts
    Lsl,
    Lsr,
    Asr,
    Ror,
    Rrx,
}

impl Mnemonic {
    pub fn is_branching_instruction(&self) -> bool {
        matches!(
            self,
            Mnemonic::Bzs
                | Mnemonic::Bzc
                | Mnemonic::Bcs
                | Mnemonic::Bcc
                | Mnemonic::Bge
                | Mnemonic::Blt
                | Mnemonic::B
                | Mnemonic::Bl
        )
    }

    pub fn is_memory_access(&self) -> bool {
        matches!(
            self,
            Mnemonic::Ldr
                | Mnemonic::Ldrb
                | Mnemonic::Str
                | Mnemonic::Strb
                | Mnemonic::Push
                | Mnemonic::Pop
        )
    }
}
