use std::io::BufRead;

use thiserror::Error;

/// Longest line accepted from the input in bytes, newline excluded.
///
/// A full 255 byte record is longer than this, so files are expected to use the usual 16 or 32
/// byte records.
pub const MAX_LINE_LENGTH: usize = 100;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("failed to read line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line} is {length} bytes long, the limit is {limit}")]
    TooLong {
        line: usize,
        length: usize,
        limit: usize,
    },
}

/// A line of input together with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// Yields the lines of a reader one at a time until end of input.
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    line_number: usize,
    max_length: usize,
    buffer: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_max_length(reader, MAX_LINE_LENGTH)
    }

    pub fn with_max_length(reader: R, max_length: usize) -> Self {
        Self {
            reader,
            line_number: 0,
            max_length,
            buffer: String::new(),
        }
    }

    /// Number of the last line handed out, 0 before the first one.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<Line, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        let line = self.line_number + 1;
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(source) => return Some(Err(ReadError::Io { line, source })),
        }
        self.line_number = line;

        let text = self.buffer.trim_end_matches(['\n', '\r']);
        let length = text.len();
        if length > self.max_length {
            return Some(Err(ReadError::TooLong {
                line,
                length,
                limit: self.max_length,
            }));
        }

        Some(Ok(Line {
            number: line,
            text: text.to_owned(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn line(number: usize, text: &str) -> Line {
        Line {
            number,
            text: text.to_owned(),
        }
    }

    #[test]
    fn test_lines() {
        let input = ":0200000000609e\r\n:00000001FF\n\nlast";
        let lines = LineReader::new(input.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            lines,
            vec![
                line(1, ":0200000000609e"),
                line(2, ":00000001FF"),
                line(3, ""),
                line(4, "last"),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let mut reader = LineReader::new("".as_bytes());
        assert!(reader.next().is_none());
        assert_eq!(reader.line_number(), 0);
    }

    #[test]
    fn test_too_long() {
        let input = format!("short\n{}\nafter\n", "0".repeat(MAX_LINE_LENGTH + 1));
        let mut reader = LineReader::new(input.as_bytes());
        assert_eq!(reader.next().unwrap().unwrap(), line(1, "short"));
        match reader.next() {
            Some(Err(ReadError::TooLong { line, length, .. })) => {
                assert_eq!(line, 2);
                assert_eq!(length, MAX_LINE_LENGTH + 1);
            }
            other => panic!("expected a too long line, got {other:?}"),
        }
        assert_eq!(reader.next().unwrap().unwrap(), line(3, "after"));
    }

    #[test]
    fn test_limit_counts_bytes() {
        // 60 characters, 120 bytes
        let input = "é".repeat(60);
        match LineReader::new(input.as_bytes()).next() {
            Some(Err(ReadError::TooLong { length, limit, .. })) => {
                assert_eq!(length, 120);
                assert_eq!(limit, MAX_LINE_LENGTH);
            }
            other => panic!("expected a too long line, got {other:?}"),
        }
    }

    #[test]
    fn test_limit_is_inclusive() {
        let input = "x".repeat(8);
        let mut reader = LineReader::with_max_length(input.as_bytes(), 8);
        assert_eq!(reader.next().unwrap().unwrap(), line(1, &input));
    }
}
