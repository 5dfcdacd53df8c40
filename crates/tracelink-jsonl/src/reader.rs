//! JSONL reading operations.
//!
//! [`JsonlReader`] wraps an async reader, tracks line numbers, and parses
//! each non-blank line into a typed record. Lines that fail to parse are
//! skipped and turned into [`Warning`]s instead of aborting the read.

use crate::Result;
use crate::warning::Warning;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// A successfully parsed record together with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    /// The 1-based line number of the record.
    pub line_number: usize,
    /// The parsed value.
    pub value: T,
}

/// Async reader for JSONL (JSON Lines) data.
///
/// # Examples
///
/// ```no_run
/// use tracelink_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("trace.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// let (records, warnings) = reader.read_resilient::<serde_json::Value>().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Line number of the last line read (0 before any line is read).
    line_number: usize,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
        }
    }

    /// Returns the 1-based number of the last line read, or 0 before any read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line, without its trailing newline.
    ///
    /// Returns `Ok(None)` at end of input. Bytes are returned unchecked so
    /// that invalid UTF-8 can be reported per line by the caller.
    pub async fn next_raw_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buf).await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    /// Reads every remaining line, parsing each into `T`.
    ///
    /// Blank lines are ignored. Lines that are not valid UTF-8 or not valid
    /// JSON for `T` are skipped and reported as warnings. Only I/O failures
    /// of the underlying reader are returned as errors.
    pub async fn read_resilient<T: DeserializeOwned>(
        &mut self,
    ) -> Result<(Vec<Record<T>>, Vec<Warning>)> {
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        while let Some(bytes) = self.next_raw_line().await? {
            let line_number = self.line_number;

            let Ok(line) = String::from_utf8(bytes) else {
                tracing::warn!(line_number, "Skipping line with invalid UTF-8");
                warnings.push(Warning::SkippedLine {
                    line_number,
                    reason: "invalid UTF-8".to_string(),
                });
                continue;
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<T>(trimmed) {
                Ok(value) => records.push(Record { line_number, value }),
                Err(e) => {
                    tracing::warn!(line_number, error = %e, "Skipping malformed JSON line");
                    warnings.push(Warning::MalformedJson {
                        line_number,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok((records, warnings))
    }
}

/// Opens `path` and reads it with [`JsonlReader::read_resilient`].
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read. Malformed lines
/// are not errors; they come back in the warning list.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<Record<T>>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Reading JSONL file");
    let file = File::open(path).await?;
    JsonlReader::new(file).read_resilient().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[tokio::test]
    async fn line_numbers_count_blank_lines() {
        let data = "{\"id\":1}\n\n{\"id\":2}\n";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes().to_vec()));

        let (records, warnings) = reader.read_resilient::<Row>().await.unwrap();

        assert!(warnings.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_number, 1);
        assert_eq!(records[1].line_number, 3);
        assert_eq!(records[1].value, Row { id: 2 });
    }

    #[tokio::test]
    async fn handles_crlf_and_missing_final_newline() {
        let data = "{\"id\":1}\r\n{\"id\":2}";
        let mut reader = JsonlReader::new(Cursor::new(data.as_bytes().to_vec()));

        let (records, warnings) = reader.read_resilient::<Row>().await.unwrap();

        assert!(warnings.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(reader.line_number(), 2);
    }

    #[tokio::test]
    async fn invalid_utf8_is_skipped_with_warning() {
        let mut data = b"{\"id\":1}\n".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"{\"id\":3}\n");
        let mut reader = JsonlReader::new(Cursor::new(data));

        let (records, warnings) = reader.read_resilient::<Row>().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            warnings,
            vec![Warning::SkippedLine {
                line_number: 2,
                reason: "invalid UTF-8".to_string(),
            }]
        );
    }
}
