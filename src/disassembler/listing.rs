use std::fmt;

use thiserror::Error;

use crate::{
    ihex::{HexRecord, RecordType},
    isa::Instruction,
};

use super::decode_instruction;

/// One decoded instruction together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblyLine {
    pub address: u16,
    /// The two instruction bytes in file order, low byte first
    pub raw_bytes: [u8; 2],
    pub instruction: Instruction,
}

impl DisassemblyLine {
    pub fn word(&self) -> u16 {
        u16::from_le_bytes(self.raw_bytes)
    }
}

/// E.g. `0100 6060\tmov\tr0, 6`
impl fmt::Display for DisassemblyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x} {:02x}{:02x}\t{}",
            self.address, self.raw_bytes[0], self.raw_bytes[1], self.instruction
        )
    }
}

/// Outcome of disassembling a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disassembly {
    Continue(Vec<DisassemblyLine>),
    /// The end-of-data record was reached, nothing after it is read
    Terminated,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("data record has an odd byte count: {record}")]
    OddByteCount { record: HexRecord },
    #[error("disassembly was halted by an earlier error")]
    Halted,
}

/// Turn a record into listing lines.
///
/// The payload is read as consecutive little-endian words starting at the record address.
#[tracing::instrument]
pub fn disassemble(record: &HexRecord) -> Result<Disassembly, DriverError> {
    match record.record_type() {
        RecordType::EndOfFile => return Ok(Disassembly::Terminated),
        RecordType::Data => {}
        other => {
            tracing::warn!(
                "skipping {} record at address {:#06x}",
                other,
                record.address()
            );
            return Ok(Disassembly::Continue(vec![]));
        }
    }

    if record.payload().len() % 2 != 0 {
        return Err(DriverError::OddByteCount {
            record: record.clone(),
        });
    }

    let lines = record
        .payload()
        .chunks_exact(2)
        .enumerate()
        .map(|(k, bytes)| {
            let raw_bytes = [bytes[0], bytes[1]];
            let address = record.address().wrapping_add(2 * k as u16);
            let instruction =
                decode_instruction(u16::from_le_bytes(raw_bytes), address.wrapping_add(2));
            DisassemblyLine {
                address,
                raw_bytes,
                instruction,
            }
        })
        .collect();

    Ok(Disassembly::Continue(lines))
}

/// State of a [`Driver`] between records. A record is decoded entirely within one
/// [`Driver::feed`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DriverState {
    #[default]
    Idle,
    Terminated,
    Failed,
}

/// Feeds records through [`disassemble`] one at a time.
///
/// Once the end-of-data record has been seen every later record is ignored, and once a record
/// fails nothing more is disassembled.
#[derive(Debug, Default)]
pub struct Driver {
    state: DriverState,
    records: usize,
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of records disassembled so far, the end-of-data record included.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn is_terminated(&self) -> bool {
        self.state == DriverState::Terminated
    }

    #[tracing::instrument]
    pub fn feed(&mut self, record: &HexRecord) -> Result<Disassembly, DriverError> {
        match self.state {
            DriverState::Terminated => return Ok(Disassembly::Terminated),
            DriverState::Failed => return Err(DriverError::Halted),
            DriverState::Idle => {}
        }

        let result = disassemble(record);
        self.state = match &result {
            Ok(Disassembly::Continue(_)) => DriverState::Idle,
            Ok(Disassembly::Terminated) => DriverState::Terminated,
            Err(_) => DriverState::Failed,
        };
        if result.is_ok() {
            self.records += 1;
        }

        result
    }
}
