use thiserror::Error;

/// Number of bits in the words handled here.
pub const WORD_BITS: u32 = 32;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitRangeError {
    #[error("most significant position {msp} is below least significant position {lsp}")]
    Inverted { msp: u32, lsp: u32 },
    #[error("bit position {0} is outside a 32-bit word")]
    OutOfWord(u32),
}

/// An inclusive range of bits `lsp..=msp` within a 32-bit word, counted from the least
/// significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    msp: u32,
    lsp: u32,
}

impl BitRange {
    pub fn new(msp: u32, lsp: u32) -> Result<Self, BitRangeError> {
        if msp >= WORD_BITS {
            return Err(BitRangeError::OutOfWord(msp));
        }
        if msp < lsp {
            return Err(BitRangeError::Inverted { msp, lsp });
        }
        Ok(Self { msp, lsp })
    }

    /// Range known at compile time, e.g. an instruction field.
    ///
    /// Evaluated in a `const` context an invalid range fails the build.
    pub const fn fixed(msp: u32, lsp: u32) -> Self {
        assert!(msp < WORD_BITS && lsp <= msp, "invalid bit range");
        Self { msp, lsp }
    }

    pub fn lsp(self) -> u32 {
        self.lsp
    }

    /// Number of bits covered by the range.
    pub fn width(self) -> u32 {
        self.msp - self.lsp + 1
    }

    /// Ones over `lsp..=msp`, zeros elsewhere.
    pub fn mask(self) -> u32 {
        low_mask(self.msp + 1) & !low_mask(self.lsp)
    }

    /// Bits `lsp..=msp` of `value`, shifted down so that `lsp` becomes bit 0.
    pub fn get(self, value: u32) -> u32 {
        (value & low_mask(self.msp + 1)) >> self.lsp
    }

    /// `value` with the `msp - lsp` bits starting at `lsp` replaced by the low bits of
    /// `new_value`.
    ///
    /// The replaced field is one bit narrower than what [`BitRange::get`] reads back; bit
    /// `msp` itself is left untouched.
    pub fn set(self, value: u32, new_value: u32) -> u32 {
        let mask = low_mask(self.msp - self.lsp) << self.lsp;
        (value & !mask) | ((new_value << self.lsp) & mask)
    }
}

/// Ones in the `width` lowest bits. A full-word width is special cased as shifting a `u32` by
/// 32 overflows.
fn low_mask(width: u32) -> u32 {
    if width >= WORD_BITS {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Extract bits `lsp..=msp` of `value`, right aligned.
pub fn get_bits(value: u32, msp: u32, lsp: u32) -> Result<u32, BitRangeError> {
    Ok(BitRange::new(msp, lsp)?.get(value))
}

/// Inject `new_value` into `value` starting at bit `lsp`, see [`BitRange::set`] for the width
/// of the replaced field.
pub fn set_bits(value: u32, msp: u32, lsp: u32, new_value: u32) -> Result<u32, BitRangeError> {
    Ok(BitRange::new(msp, lsp)?.set(value, new_value))
}
