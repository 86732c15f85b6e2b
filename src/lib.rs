/// Bit field extraction and injection on 32-bit words.
pub mod bits;

/// Disassembles P16 programs.
///
/// The steps are:
/// 1. **Reading** - splitting the input into numbered lines
/// 2. **Decoding** - turning each line into an Intel HEX record
/// 3. **Disassembling** - decoding the little-endian instruction words of each data record into
///    listing lines until the end-of-data record
pub mod disassembler;

/// Intel HEX records and the line level machinery to read them.
pub mod ihex;

/// Tracing setup for the binary.
pub mod instrumentation;

/// The P16 instruction set: mnemonics, operands and decoded instructions.
pub mod isa;
