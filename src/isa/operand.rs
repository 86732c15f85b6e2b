use std::fmt;

/// A register named by an operand.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Register {
    /// `r0`..`r15`
    General(u8),
    /// `pc`, the name `r15` takes as destination of the high register move
    Pc,
    /// `lr`, the name `r14` takes as source of the high register move
    Lr,
}

impl Register {
    /// Destination of the high register move, `r15` is written `pc`.
    pub fn aliased_destination(index: u8) -> Self {
        match index {
            15 => Register::Pc,
            _ => Register::General(index),
        }
    }

    /// Source of the high register move, `r14` is written `lr`.
    pub fn aliased_source(index: u8) -> Self {
        match index {
            14 => Register::Lr,
            _ => Register::General(index),
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::General(index) => write!(f, "r{}", index),
            Register::Pc => write!(f, "pc"),
            Register::Lr => write!(f, "lr"),
        }
    }
}

/// Program status registers reachable through `msr` and `mrs`.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StatusRegister {
    Cpsr,
    Spsr,
}

/// Second half of an indexed memory operand.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Offset {
    Immediate(u16),
    Register(Register),
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Immediate(value) => write!(f, "{}", value),
            Offset::Register(register) => write!(f, "{}", register),
        }
    }
}

/// An operand of an [`instruction`][super::Instruction].
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Operand {
    Register(Register),
    Status(StatusRegister),
    /// Unsigned immediate, written in decimal
    Immediate(u16),
    /// Branch target, written as `0x` followed by four hex digits
    Address(u16),
    /// `[base, offset]`
    Memory { base: Register, offset: Offset },
}

impl Operand {
    pub fn register(index: u8) -> Self {
        Operand::Register(Register::General(index))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(register) => write!(f, "{}", register),
            Operand::Status(status) => write!(f, "{}", status),
            Operand::Immediate(value) => write!(f, "{}", value),
            Operand::Address(address) => write!(f, "0x{:04x}", address),
            Operand::Memory { base, offset } => write!(f, "[{}, {}]", base, offset),
        }
    }
}
