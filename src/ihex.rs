/// Parsing of single text lines into [`HexRecord`]s.
pub mod decoder;

/// Decoded record fields.
pub mod record;

/// Bounded, numbered line supply from any [`std::io::BufRead`].
pub mod reader;

/// Line and column positions used when reporting bad input.
pub mod source_position;

pub use decoder::{char_to_hex, decode_record, hex_to_int, ChecksumPolicy, DecodeError, RecordDecoder};
pub use reader::{Line, LineReader, ReadError, MAX_LINE_LENGTH};
pub use record::{HexRecord, RecordType};
pub use source_position::SourcePosition;
