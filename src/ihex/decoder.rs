use thiserror::Error;

use super::record::{HexRecord, RecordType};

/// Every record starts with this character.
pub const START_CODE: char = ':';

/// Length of the shortest possible record, `:LLAAAATTCC`.
pub const MIN_RECORD_LEN: usize = 11;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record does not start with ':', found {found:?}")]
    MalformedHeader { found: Option<char> },
    #[error("invalid hex digit {found:?} at column {column}")]
    InvalidHexDigit { column: usize, found: char },
    #[error("record is {found} characters long, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("unknown record type {0:#04x}")]
    UnknownRecordType(u8),
    #[error("checksum mismatch, record carries {found:#04x} but expected {expected:#04x}")]
    ChecksumMismatch { expected: u8, found: u8 },
    #[error("unexpected characters after the checksum at column {column}")]
    TrailingCharacters { column: usize },
    #[error("payload of {0} bytes does not fit in a single record")]
    PayloadTooLong(usize),
}

impl DecodeError {
    /// Column in the line where the error was detected, if it points at one.
    pub fn column(&self) -> Option<usize> {
        match self {
            DecodeError::MalformedHeader { .. } => Some(1),
            DecodeError::InvalidHexDigit { column, .. } => Some(*column),
            DecodeError::TrailingCharacters { column } => Some(*column),
            _ => None,
        }
    }
}

/// How records with a bad checksum are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ChecksumPolicy {
    /// Accept a record with a bad checksum as long as it has exactly the expected length.
    #[default]
    Lenient,
    /// Reject every record whose checksum does not verify.
    Strict,
}

/// Value of hex digit `c` weighted by its position, `digit * 16^(digit_weight - 1)`.
///
/// `None` if `c` is not a hex digit or the result overflows.
pub fn hex_to_int(c: char, digit_weight: u32) -> Option<u32> {
    let digit = c.to_digit(16)?;
    16u32
        .checked_pow(digit_weight.saturating_sub(1))
        .and_then(|multiplier| digit.checked_mul(multiplier))
}

/// Byte written as the two hex digits `high` and `low`.
pub fn char_to_hex(high: char, low: char) -> Option<u8> {
    let value = hex_to_int(high, 2)? + hex_to_int(low, 1)?;
    u8::try_from(value).ok()
}

/// Decode a line with the [`ChecksumPolicy::Lenient`] policy.
pub fn decode_record(line: &str) -> Result<HexRecord, DecodeError> {
    RecordDecoder::default().decode(line)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    policy: ChecksumPolicy,
}

impl RecordDecoder {
    pub fn new(policy: ChecksumPolicy) -> Self {
        Self { policy }
    }

    /// Parse `:LLAAAATT[DD...]CC` into a record.
    #[tracing::instrument]
    pub fn decode(&self, line: &str) -> Result<HexRecord, DecodeError> {
        let mut cursor = Cursor::new(line.trim_end());

        match cursor.read_char() {
            Some(START_CODE) => {}
            found => return Err(DecodeError::MalformedHeader { found }),
        }
        cursor.expect_len(MIN_RECORD_LEN)?;

        let byte_count = cursor.read_byte()?;
        let address = u16::from_be_bytes([cursor.read_byte()?, cursor.read_byte()?]);
        let record_type = RecordType::try_from(cursor.read_byte()?)?;

        cursor.expect_len(MIN_RECORD_LEN + 2 * byte_count as usize)?;
        let payload = (0..byte_count)
            .map(|_| cursor.read_byte())
            .collect::<Result<Vec<u8>, DecodeError>>()?;

        let checksum = cursor.read_byte()?;
        let record = HexRecord::from_parts(address, record_type, payload, checksum);

        let exact_length = cursor.at_end();
        if self.policy == ChecksumPolicy::Strict && !exact_length {
            return Err(DecodeError::TrailingCharacters {
                column: cursor.column(),
            });
        }

        // Every byte including the checksum sums to zero in a valid record
        if cursor.sum() != 0 {
            let mismatch = DecodeError::ChecksumMismatch {
                expected: record.expected_checksum(),
                found: checksum,
            };
            match self.policy {
                ChecksumPolicy::Lenient if exact_length => {
                    tracing::warn!(%record, "accepting record with bad checksum: {mismatch}");
                }
                _ => return Err(mismatch),
            }
        }

        Ok(record)
    }
}

/// Reads hex byte pairs from a line while keeping the running checksum.
struct Cursor {
    chars: Vec<char>,
    position: usize,
    sum: u8,
}

impl Cursor {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            position: 0,
            sum: 0,
        }
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.chars.get(self.position).copied();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn read_digit(&mut self) -> Result<char, DecodeError> {
        let column = self.column();
        let found = self.read_char().ok_or(DecodeError::LengthMismatch {
            expected: column,
            found: self.chars.len(),
        })?;
        if found.is_ascii_hexdigit() {
            Ok(found)
        } else {
            Err(DecodeError::InvalidHexDigit { column, found })
        }
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let column = self.column();
        let high = self.read_digit()?;
        let low = self.read_digit()?;
        let byte = char_to_hex(high, low).ok_or(DecodeError::InvalidHexDigit { column, found: high })?;
        self.sum = self.sum.wrapping_add(byte);
        Ok(byte)
    }

    fn expect_len(&self, expected: usize) -> Result<(), DecodeError> {
        if self.chars.len() < expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                found: self.chars.len(),
            });
        }
        Ok(())
    }

    /// 1-based column of the next character.
    fn column(&self) -> usize {
        self.position + 1
    }

    fn at_end(&self) -> bool {
        self.position == self.chars.len()
    }

    fn sum(&self) -> u8 {
        self.sum
    }
}
