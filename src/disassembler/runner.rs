use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use clap::Args;
use thiserror::Error;

use crate::{
    ihex::{ChecksumPolicy, DecodeError, LineReader, ReadError, RecordDecoder, SourcePosition},
    isa::{Instruction, UnknownOpcode},
};

use super::listing::{Disassembly, Driver, DriverError};

#[derive(Args, Debug, Clone)]
pub struct DisassemblyArgs {
    #[clap(help = "Intel HEX file to disassemble")]
    pub input: PathBuf,
    #[clap(long)]
    #[clap(help = "Reject every record with a bad checksum")]
    #[clap(long_help = "Reject every record with a bad checksum or with characters
after the checksum. By default a record with a bad checksum
is accepted with a warning when its length is exact.")]
    pub strict: bool,
    #[clap(long)]
    #[clap(help = "Print the fields of each record before its listing")]
    pub records: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub policy: ChecksumPolicy,
    /// Write each record as a `;` comment before its instructions
    pub show_records: bool,
}

impl From<&DisassemblyArgs> for Options {
    fn from(args: &DisassemblyArgs) -> Self {
        Options {
            policy: if args.strict {
                ChecksumPolicy::Strict
            } else {
                ChecksumPolicy::Lenient
            },
            show_records: args.records,
        }
    }
}

/// What a finished run went through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub instructions: usize,
    /// Whether the end-of-data record was reached before the end of input
    pub terminated: bool,
    /// Words without a mnemonic, by address
    pub unknown_opcodes: Vec<(u16, UnknownOpcode)>,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("{position}: {source}\n  {text}")]
    Decode {
        position: SourcePosition,
        text: String,
        #[source]
        source: DecodeError,
    },
    #[error("line {line}: {source}")]
    Driver {
        line: usize,
        #[source]
        source: DriverError,
    },
    #[error("failed to write listing")]
    Write(#[source] io::Error),
}

/// Disassemble every record read from `input` and write the listing to `output`.
///
/// Stops at the end-of-data record. Running out of input before it is not an error.
#[tracing::instrument(skip(input, output))]
pub fn disassemble_stream<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    options: &Options,
) -> Result<Summary, RunError> {
    let decoder = RecordDecoder::new(options.policy);
    let mut driver = Driver::new();
    let mut summary = Summary::default();

    for line in LineReader::new(input) {
        let line = line?;
        let record = decoder.decode(&line.text).map_err(|source| RunError::Decode {
            position: SourcePosition::new(line.number, source.column().unwrap_or(1)),
            text: line.text.clone(),
            source,
        })?;
        tracing::debug!("line {}: {}", line.number, record);

        if options.show_records {
            writeln!(output, "; {}", record).map_err(RunError::Write)?;
        }

        let disassembly = driver.feed(&record).map_err(|source| RunError::Driver {
            line: line.number,
            source,
        })?;
        match disassembly {
            Disassembly::Continue(lines) => {
                for listing_line in lines {
                    if let Instruction::Unknown(unknown) = &listing_line.instruction {
                        summary.unknown_opcodes.push((listing_line.address, *unknown));
                    }
                    writeln!(output, "{}", listing_line).map_err(RunError::Write)?;
                    summary.instructions += 1;
                }
            }
            Disassembly::Terminated => break,
        }
    }

    summary.records = driver.records();
    summary.terminated = driver.is_terminated();
    if !summary.terminated {
        tracing::warn!("input ended without an end-of-data record");
    }
    output.flush().map_err(RunError::Write)?;

    Ok(summary)
}

/// Disassemble the file named by `args` to stdout.
#[tracing::instrument]
pub fn disassemble_file(args: &DisassemblyArgs) -> Result<Summary, RunError> {
    let file = File::open(&args.input).map_err(|source| RunError::Open {
        path: args.input.clone(),
        source,
    })?;
    let stdout = io::stdout();
    let mut output = stdout.lock();

    disassemble_stream(BufReader::new(file), &mut output, &Options::from(args))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn run(input: &str, options: &Options) -> (Result<Summary, RunError>, String) {
        let mut output = Vec::new();
        let result = disassemble_stream(input.as_bytes(), &mut output, options);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_stream() {
        let input = ":0401000060600340F8\n:00000001FF\n";
        let (result, output) = run(input, &Options::default());
        assert_eq!(output, "0100 6060\tmov\tr0, 6\n0102 0340\tbzs\t0x010a\n");
        assert_eq!(
            result.unwrap(),
            Summary {
                records: 2,
                instructions: 2,
                terminated: true,
                unknown_opcodes: vec![],
            }
        );
    }

    #[test]
    fn test_stops_at_end_of_data() {
        let input = ":00000001FF\nnot a record\n";
        let (result, output) = run(input, &Options::default());
        assert_eq!(output, "");
        assert!(result.unwrap().terminated);
    }

    #[test]
    fn test_missing_end_of_data() {
        let (result, output) = run(":020000000000FE\n", &Options::default());
        assert_eq!(output, "0000 0000\tldr\tr0, [r0, 0]\n");
        let summary = result.unwrap();
        assert!(!summary.terminated);
        assert_eq!(summary.records, 1);
    }

    #[test]
    fn test_show_records() {
        let options = Options {
            show_records: true,
            ..Options::default()
        };
        let (result, output) = run(":02000000302CA2\n:00000001FF\n", &options);
        assert_eq!(
            output,
            "; 02 0000 00 302c a2\n0000 302c\t.word\t0x2c30\n; 00 0000 01  ff\n"
        );
        let summary = result.unwrap();
        assert_eq!(
            summary.unknown_opcodes,
            vec![(0x0000, UnknownOpcode { word: 0x2c30, class: 1 })]
        );
    }

    #[test]
    fn test_decode_error_position() {
        let input = ":00000001FF\n";
        let (result, _) = run(&format!(":0200000000G0FE\n{input}"), &Options::default());
        match result {
            Err(RunError::Decode { position, text, .. }) => {
                assert_eq!(position, SourcePosition::new(1, 12));
                assert_eq!(text, ":0200000000G0FE");
            }
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_odd_byte_count() {
        let (result, _) = run(":0100000000FF\n:00000001FF\n", &Options::default());
        match result {
            Err(RunError::Driver { line, source }) => {
                assert_eq!(line, 1);
                assert!(matches!(source, DriverError::OddByteCount { .. }));
            }
            other => panic!("expected a driver error, got {other:?}"),
        }
    }

    #[test]
    fn test_checksum_policy() {
        let input = ":020000000000FF\n:00000001FF\n";
        let (result, output) = run(input, &Options::default());
        assert!(result.is_ok());
        assert_eq!(output, "0000 0000\tldr\tr0, [r0, 0]\n");

        let strict = Options {
            policy: ChecksumPolicy::Strict,
            ..Options::default()
        };
        let (result, _) = run(input, &strict);
        assert!(matches!(
            result,
            Err(RunError::Decode {
                source: DecodeError::ChecksumMismatch { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_options_from_args() {
        let args = DisassemblyArgs {
            input: PathBuf::from("program.hex"),
            strict: true,
            records: false,
        };
        assert_eq!(
            Options::from(&args),
            Options {
                policy: ChecksumPolicy::Strict,
                show_records: false,
            }
        );
    }

    #[test]
    fn test_open_error() {
        let args = DisassemblyArgs {
            input: PathBuf::from("does/not/exist.hex"),
            strict: false,
            records: false,
        };
        assert!(matches!(
            disassemble_file(&args),
            Err(RunError::Open { .. })
        ));
    }
}
