use std::fmt;

use super::decoder::DecodeError;

/// Largest payload a single record can describe, its byte count is one byte wide.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Type field of a record.
///
/// Only [`RecordType::Data`] and [`RecordType::EndOfFile`] are interpreted, the address
/// extension records are recognised so they can be reported and skipped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::FromRepr,
)]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum RecordType {
    Data = 0x00,
    EndOfFile = 0x01,
    ExtendedSegmentAddress = 0x02,
    StartSegmentAddress = 0x03,
    ExtendedLinearAddress = 0x04,
    StartLinearAddress = 0x05,
}

impl TryFrom<u8> for RecordType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RecordType::from_repr(value).ok_or(DecodeError::UnknownRecordType(value))
    }
}

impl From<RecordType> for u8 {
    fn from(record_type: RecordType) -> u8 {
        record_type as u8
    }
}

/// One decoded Intel HEX record.
///
/// A record is immutable once built; the payload always holds exactly `byte_count` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRecord {
    address: u16,
    record_type: RecordType,
    payload: Vec<u8>,
    checksum: u8,
}

impl HexRecord {
    /// Build a record and compute its checksum.
    pub fn new(address: u16, record_type: RecordType, payload: Vec<u8>) -> Result<Self, DecodeError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(DecodeError::PayloadTooLong(payload.len()));
        }
        let checksum = Self::checksum_of(payload.len() as u8, address, record_type, &payload);
        Ok(Self {
            address,
            record_type,
            payload,
            checksum,
        })
    }

    /// Record as read from input, keeping whatever checksum it carried.
    pub(crate) fn from_parts(
        address: u16,
        record_type: RecordType,
        payload: Vec<u8>,
        checksum: u8,
    ) -> Self {
        debug_assert!(payload.len() <= MAX_PAYLOAD_LEN);
        Self {
            address,
            record_type,
            payload,
            checksum,
        }
    }

    /// The end-of-file record, `:00000001FF`.
    pub fn end_of_file() -> Self {
        Self::from_parts(0x0000, RecordType::EndOfFile, vec![], 0xFF)
    }

    pub fn byte_count(&self) -> u8 {
        self.payload.len() as u8
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Two's complement of the sum of every byte preceding the checksum field.
    pub fn expected_checksum(&self) -> u8 {
        Self::checksum_of(self.byte_count(), self.address, self.record_type, &self.payload)
    }

    pub fn is_checksum_valid(&self) -> bool {
        self.checksum == self.expected_checksum()
    }

    fn checksum_of(byte_count: u8, address: u16, record_type: RecordType, payload: &[u8]) -> u8 {
        let [addr_hi, addr_lo] = address.to_be_bytes();
        let sum = [byte_count, addr_hi, addr_lo, record_type.into()]
            .iter()
            .chain(payload)
            .fold(0u8, |sum, byte| sum.wrapping_add(*byte));
        sum.wrapping_neg()
    }
}

/// Record fields in the order they appear on the line, e.g.
/// `10 041a 00 0e24c00c0008b10c11080c5c910c1020 c1`.
impl fmt::Display for HexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x} {:04x} {:02x} ",
            self.byte_count(),
            self.address,
            u8::from(self.record_type)
        )?;
        for byte in &self.payload {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, " {:02x}", self.checksum)
    }
}
